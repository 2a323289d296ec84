use crate::core::outcome::{simulate_round, RoundOutcome};
use crate::core::program::RaceRound;
use crate::core::state_handler::StateHandler;
use crate::post::race_result::RoundResult;
use rand::Rng;
use serde::Serialize;

const SPEED_VARIATION_MIN: f64 = 0.8;
const SPEED_VARIATION_MAX: f64 = 1.2;
const TICK_VARIATION_MIN: f64 = 0.95;
const TICK_VARIATION_MAX: f64 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RaceStatus {
    Running,
    AtFinishLine,
}

/// HorsePosition is the animated position of one horse at the current tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorsePosition {
    pub horse_id: u32,
    pub name: String,
    pub color: String,
    pub lane: u32,
    pub position: f64,
    pub race_prog: f64,
}

#[derive(Debug, Clone)]
struct Runner {
    horse_id: u32,
    name: String,
    color: String,
    lane: u32,
    sh: StateHandler,
}

/// Race animates one round of the program. The finishing order is determined once when the race
/// is created; the animation only converges to it.
#[derive(Debug, Clone)]
pub struct Race {
    pub round: u32,
    pub distance: u32,
    pub tot_no_ticks: u32,
    pub cur_tick: u32,
    pub status: RaceStatus,
    outcome: RoundOutcome,
    runners: Vec<Runner>,
}

impl Race {
    pub fn new<R: Rng + ?Sized>(race_round: &RaceRound, tot_no_ticks: u32, rng: &mut R) -> Race {
        let outcome = simulate_round(&race_round.get_horses(), race_round.distance, rng);
        let distance = race_round.distance as f64;
        let base_step = distance / tot_no_ticks.max(1) as f64;

        let runners = race_round
            .horses
            .iter()
            .map(|entry| {
                let final_rank = outcome
                    .finish_position_of(entry.horse.id)
                    .unwrap_or(race_round.horses.len() as u32);
                let step = base_step * rng.gen_range(SPEED_VARIATION_MIN..SPEED_VARIATION_MAX);

                Runner {
                    horse_id: entry.horse.id,
                    name: entry.horse.name.to_owned(),
                    color: entry.horse.color.to_owned(),
                    lane: entry.lane,
                    sh: StateHandler::new(distance, step, final_rank),
                }
            })
            .collect::<Vec<Runner>>();

        // nothing to animate for an empty round
        let status = if runners.is_empty() {
            RaceStatus::AtFinishLine
        } else {
            RaceStatus::Running
        };

        Race {
            round: race_round.round,
            distance: race_round.distance,
            tot_no_ticks,
            cur_tick: 0,
            status,
            outcome,
            runners,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// simulate_tick advances all horses by one tick. Nothing moves while `racing` is false, such
    /// that a paused round stays frozen in place. Returns true if the positions changed.
    pub fn simulate_tick<R: Rng + ?Sized>(&mut self, racing: bool, rng: &mut R) -> bool {
        if !racing || self.status == RaceStatus::AtFinishLine {
            return false;
        }

        // increment discretization variable
        self.cur_tick += 1;
        let progress = self.cur_tick as f64 / self.tot_no_ticks.max(1) as f64;

        for runner in self.runners.iter_mut() {
            let step_variation = rng.gen_range(TICK_VARIATION_MIN..TICK_VARIATION_MAX);
            runner.sh.update_race_prog(progress, step_variation);
        }

        // end race when all horses finished or the tick budget is used up
        let all_finished = self.get_all_finished();
        if all_finished || self.cur_tick >= self.tot_no_ticks {
            if !all_finished {
                for runner in self.runners.iter_mut() {
                    runner.sh.snap_to_finish();
                }
            }
            self.status = RaceStatus::AtFinishLine;
        }

        true
    }

    pub fn get_all_finished(&self) -> bool {
        self.runners.iter().all(|runner| runner.sh.get_finished())
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// get_positions returns the current position of every horse in lane order.
    pub fn get_positions(&self) -> Vec<HorsePosition> {
        self.runners
            .iter()
            .map(|runner| HorsePosition {
                horse_id: runner.horse_id,
                name: runner.name.to_owned(),
                color: runner.color.to_owned(),
                lane: runner.lane,
                position: runner.sh.get_position(),
                race_prog: runner.sh.get_race_prog(),
            })
            .collect()
    }

    /// into_round_result converts the finished race into its result.
    pub fn into_round_result(self, completed_at: String) -> RoundResult {
        RoundResult {
            round: self.round,
            distance: self.distance,
            results: self.outcome.results,
            completed_at,
        }
    }
}
