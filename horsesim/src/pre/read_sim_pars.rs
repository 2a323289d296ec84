use crate::core::horse::Horse;
use crate::core::program::{HORSES_PER_ROUND, RACE_DISTANCES, ROSTER_SIZE};
use anyhow::Context;
use helpers::general::InputValueError;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::Path;

/// * `roster_size` - Number of horses generated for a session
/// * `horses_per_round` - Number of horses selected for every round
/// * `distances` - (m) Distance of every round, one round per entry
/// * `tick_interval_ms` - (ms) Time between two animation ticks
/// * `animation_duration_ms` - (ms) Duration of the animation of one round
/// * `finish_hold_ms` - (ms) Time the finished positions are shown before a round resolves
/// * `inter_round_delay_ms` - (ms) Delay between the end of a round and the start of the next
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GamePars {
    pub roster_size: usize,
    pub horses_per_round: usize,
    pub distances: Vec<u32>,
    pub tick_interval_ms: u64,
    pub animation_duration_ms: u64,
    pub finish_hold_ms: u64,
    pub inter_round_delay_ms: u64,
}

impl Default for GamePars {
    fn default() -> Self {
        GamePars {
            roster_size: ROSTER_SIZE,
            horses_per_round: HORSES_PER_ROUND,
            distances: RACE_DISTANCES.to_vec(),
            tick_interval_ms: 100,
            animation_duration_ms: 5000,
            finish_hold_ms: 1000,
            inter_round_delay_ms: 1500,
        }
    }
}

impl GamePars {
    /// get_tot_no_ticks returns the tick budget of one round.
    pub fn get_tot_no_ticks(&self) -> u32 {
        (self.animation_duration_ms / self.tick_interval_ms.max(1)) as u32
    }

    /// validate checks that the parameters describe a playable program.
    pub fn validate(&self) -> Result<(), InputValueError> {
        if self.tick_interval_ms == 0 {
            return Err(InputValueError("tick_interval_ms must be positive".to_owned()));
        }
        if self.animation_duration_ms < self.tick_interval_ms
            || self.animation_duration_ms % self.tick_interval_ms != 0
        {
            return Err(InputValueError(format!(
                "animation_duration_ms ({}) must be a positive multiple of tick_interval_ms ({})",
                self.animation_duration_ms, self.tick_interval_ms
            )));
        }
        if self.distances.is_empty() || self.distances.iter().any(|&d| d == 0) {
            return Err(InputValueError(
                "distances must contain at least one positive distance".to_owned(),
            ));
        }
        if self.horses_per_round > self.roster_size {
            return Err(InputValueError(format!(
                "horses_per_round ({}) exceeds roster_size ({})",
                self.horses_per_round, self.roster_size
            )));
        }
        Ok(())
    }

    /// check_roster_size rejects a roster that cannot fill the rounds of a program.
    pub fn check_roster_size(&self, horses: &[Horse]) -> Result<(), InputValueError> {
        if horses.len() < self.horses_per_round {
            return Err(InputValueError(format!(
                "roster contains {} horses, but horses_per_round is {}",
                horses.len(),
                self.horses_per_round
            )));
        }
        Ok(())
    }
}

/// read_game_pars reads the JSON file and decodes it into the game parameters struct. Missing
/// fields keep their default values.
pub fn read_game_pars(filepath: &Path) -> anyhow::Result<GamePars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open parameter file {:?}!", filepath))?;
    let pars: GamePars = serde_json::from_reader(&fh)
        .context(format!("Failed to parse parameter file {:?}!", filepath))?;
    pars.validate()
        .context(format!("Invalid parameters in {:?}!", filepath))?;
    Ok(pars)
}

/// read_roster reads a JSON array of horses. Horse ids must be unique and every color must be a
/// parsable hex code.
pub fn read_roster(filepath: &Path) -> anyhow::Result<Vec<Horse>> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open roster file {:?}!", filepath))?;
    let horses: Vec<Horse> = serde_json::from_reader(&fh)
        .context(format!("Failed to parse roster file {:?}!", filepath))?;
    validate_roster(&horses).context(format!("Invalid roster in {:?}!", filepath))?;
    Ok(horses)
}

pub fn validate_roster(horses: &[Horse]) -> Result<(), InputValueError> {
    let mut ids = HashSet::with_capacity(horses.len());

    for horse in horses.iter() {
        if !ids.insert(horse.id) {
            return Err(InputValueError(format!("duplicate horse id {}", horse.id)));
        }
        if horse.color.parse::<css_color_parser::Color>().is_err() {
            return Err(InputValueError(format!(
                "horse {} has an invalid color {:?}",
                horse.id, horse.color
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("horsesim_pars_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut fh = std::fs::File::create(&path).unwrap();
        fh.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_match_the_standard_program() {
        let pars = GamePars::default();
        assert_eq!(pars.distances, vec![1200, 1400, 1600, 1800, 2000, 2200]);
        assert_eq!(pars.get_tot_no_ticks(), 50);
        assert!(pars.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = write_tmp("partial.json", r#"{"inter_round_delay_ms": 0}"#);
        let pars = read_game_pars(&path).unwrap();
        assert_eq!(pars.inter_round_delay_ms, 0);
        assert_eq!(pars.tick_interval_ms, 100);
        assert_eq!(pars.roster_size, 20);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let pars = GamePars {
            tick_interval_ms: 0,
            ..GamePars::default()
        };
        assert!(pars.validate().is_err());

        let pars = GamePars {
            animation_duration_ms: 5050,
            ..GamePars::default()
        };
        assert!(pars.validate().is_err());

        let pars = GamePars {
            distances: Vec::new(),
            ..GamePars::default()
        };
        assert!(pars.validate().is_err());

        let pars = GamePars {
            horses_per_round: 21,
            ..GamePars::default()
        };
        assert!(pars.validate().is_err());
    }

    #[test]
    fn roster_file_is_validated() {
        let path = write_tmp(
            "roster_ok.json",
            r##"[{"id": 1, "name": "Ada Lovelace", "color": "#FF6B6B", "condition": 70},
                 {"id": 2, "name": "Grace Hopper", "color": "#4ECDC4"}]"##,
        );
        let horses = read_roster(&path).unwrap();
        assert_eq!(horses.len(), 2);
        assert_eq!(horses[1].condition, 50);

        let path = write_tmp(
            "roster_dup.json",
            r##"[{"id": 1, "name": "a", "color": "#FF6B6B"}, {"id": 1, "name": "b", "color": "#FF6B6B"}]"##,
        );
        assert!(read_roster(&path).is_err());

        let path = write_tmp(
            "roster_color.json",
            r##"[{"id": 1, "name": "a", "color": "not a color"}]"##,
        );
        assert!(read_roster(&path).is_err());
    }

    #[test]
    fn small_roster_is_rejected() {
        let path = write_tmp(
            "roster_small.json",
            r##"[{"id": 1, "name": "a", "color": "#FF6B6B"},
                 {"id": 2, "name": "b", "color": "#4ECDC4"},
                 {"id": 3, "name": "c", "color": "#45B7D1"}]"##,
        );
        let horses = read_roster(&path).unwrap();
        assert!(GamePars::default().check_roster_size(&horses).is_err());

        let pars = GamePars {
            horses_per_round: 3,
            ..GamePars::default()
        };
        assert!(pars.check_roster_size(&horses).is_ok());
    }

    #[test]
    fn shipped_input_files_are_valid() {
        let input_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../input");

        let pars = read_game_pars(&input_dir.join("parameters/quick_program.json")).unwrap();
        assert_eq!(pars.distances.len(), 3);
        assert_eq!(pars.get_tot_no_ticks(), 60);

        let horses = read_roster(&input_dir.join("rosters/stable_of_twelve.json")).unwrap();
        assert_eq!(horses.len(), 12);
        assert!(pars.check_roster_size(&horses).is_ok());
        assert!(GamePars::default().check_roster_size(&horses).is_ok());
    }
}
