use crate::core::horse::{Horse, CONDITION_MAX};
use crate::post::race_result::RankedHorse;
use helpers::general::{argsort, round_to, SortOrder};
use rand::Rng;
use serde::Serialize;

/// (m/s) Base speed of a horse without any condition bonus
const BASE_SPEED: f64 = 15.0;
/// Maximum race time reduction for a horse in perfect condition
const MAX_CONDITION_BONUS: f64 = 0.3;
const RANDOM_FACTOR_MIN: f64 = 0.8;
const RANDOM_FACTOR_MAX: f64 = 1.2;

/// (m/s) Speed range used by calc_horse_speed
const SPEED_MIN: f64 = 12.0;
const SPEED_SPAN: f64 = 8.0;

/// RoundOutcome is the pre-determined ranking of one round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundOutcome {
    pub distance: u32,
    pub results: Vec<RankedHorse>,
}

impl RoundOutcome {
    /// winner returns the horse at finish position 1, if any horse ran.
    pub fn winner(&self) -> Option<&RankedHorse> {
        self.results.first()
    }

    /// finish_position_of returns the 1-based finish position of the given horse.
    pub fn finish_position_of(&self, horse_id: u32) -> Option<u32> {
        self.results
            .iter()
            .find(|ranked| ranked.horse.id == horse_id)
            .map(|ranked| ranked.finish_position)
    }
}

/// calc_race_time returns the race time (s) of a horse, rounded to two decimal places.
pub fn calc_race_time(condition: u32, distance: u32, random_factor: f64) -> f64 {
    let base_time = distance as f64 / BASE_SPEED;
    let condition_bonus = condition as f64 / CONDITION_MAX as f64 * MAX_CONDITION_BONUS;
    round_to(base_time * (1.0 - condition_bonus) * random_factor, 2)
}

/// simulate_round calculates the finishing order of the given horses over the given distance.
/// Every horse gets a race time that depends on its condition and a random factor in
/// [0.8, 1.2[. The results are sorted by ascending race time, ties keep the input order.
pub fn simulate_round<R: Rng + ?Sized>(horses: &[Horse], distance: u32, rng: &mut R) -> RoundOutcome {
    let race_times: Vec<f64> = horses
        .iter()
        .map(|horse| {
            let random_factor = rng.gen_range(RANDOM_FACTOR_MIN..RANDOM_FACTOR_MAX);
            calc_race_time(horse.effective_condition(), distance, random_factor)
        })
        .collect();

    let results = argsort(&race_times, SortOrder::Ascending)
        .into_iter()
        .enumerate()
        .map(|(rank, idx)| RankedHorse {
            horse: horses[idx].to_owned(),
            race_time: race_times[idx],
            finish_position: rank as u32 + 1,
        })
        .collect();

    RoundOutcome { distance, results }
}

/// calc_horse_speed returns an estimated speed (m/s) in the range [9.6, 24.0[ that depends on
/// the condition and a random factor, but not on the distance.
pub fn calc_horse_speed<R: Rng + ?Sized>(horse: &Horse, rng: &mut R) -> f64 {
    let base_speed =
        SPEED_MIN + horse.effective_condition() as f64 / CONDITION_MAX as f64 * SPEED_SPAN;
    base_speed * rng.gen_range(RANDOM_FACTOR_MIN..RANDOM_FACTOR_MAX)
}
