use serde::{Deserialize, Serialize};

pub const CONDITION_MIN: u32 = 1;
pub const CONDITION_MAX: u32 = 100;
pub const CONDITION_NEUTRAL: u32 = 50;

/// * `id` - Unique horse number, starting at 1
/// * `name` - Display name, e.g. Grace Hopper
/// * `color` - Display color as hex code, e.g. #4ECDC4
/// * `condition` - Performance attribute in [1, 100], higher is better
/// * `total_races` - Number of rounds the horse took part in
/// * `wins` - Number of rounds the horse won
/// * `win_rate` - (%) Share of won rounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horse {
    pub id: u32,
    pub name: String,
    pub color: String,
    #[serde(default = "default_condition")]
    pub condition: u32,
    #[serde(default)]
    pub total_races: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub win_rate: f64,
}

fn default_condition() -> u32 {
    CONDITION_NEUTRAL
}

impl Horse {
    pub fn new(id: u32, name: &str, color: &str, condition: u32) -> Horse {
        Horse {
            id,
            name: name.to_owned(),
            color: color.to_owned(),
            condition,
            total_races: 0,
            wins: 0,
            win_rate: 0.0,
        }
    }

    /// The method returns the condition clamped into the valid range, such that horses with
    /// malformed parameters can still take part in a race.
    pub fn effective_condition(&self) -> u32 {
        self.condition.clamp(CONDITION_MIN, CONDITION_MAX)
    }
}
