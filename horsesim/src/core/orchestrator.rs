use crate::core::horse::Horse;
use crate::core::program::{generate_program, RaceProgram, RaceRound};
use crate::core::race::{HorsePosition, Race, RaceStatus};
use crate::core::roster::generate_roster;
use crate::post::race_result::RoundResult;
use crate::pre::read_sim_pars::GamePars;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,         // no program
    ProgramReady, // program installed, nothing raced yet
    Racing,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WakeKind {
    Tick,
    FinishHold,
    InterRoundDelay,
}

/// WakeUp is the single pending suspension point of the round loop on the virtual clock.
#[derive(Debug, Clone, Copy)]
struct WakeUp {
    at_ms: u64,
    kind: WakeKind,
}

/// Orchestrator owns the session state and is its only writer. Commands (`generate_program`,
/// `toggle_race`) and the virtual clock (`advance`) are the only ways to mutate it.
///
/// The round loop never blocks: every suspension point (animation tick, finish line hold,
/// delay between rounds) is a scheduled wake-up. At most one wake-up exists at any time.
#[derive(Debug)]
pub struct Orchestrator {
    pars: GamePars,
    rng: StdRng,
    horses: Vec<Horse>,
    program: Option<RaceProgram>,
    results: Vec<RoundResult>,
    current_round: usize,
    is_racing: bool,
    round_in_flight: bool,
    positions: Vec<HorsePosition>,
    race: Option<Race>,
    wake_up: Option<WakeUp>,
    now_ms: u64,
    revision: u64,
}

impl Orchestrator {
    pub fn new(pars: GamePars, rng: StdRng) -> Orchestrator {
        Orchestrator {
            pars,
            rng,
            horses: Vec::new(),
            program: None,
            results: Vec::new(),
            current_round: 0,
            is_racing: false,
            round_in_flight: false,
            positions: Vec::new(),
            race: None,
            wake_up: None,
            now_ms: 0,
            revision: 0,
        }
    }

    /// install_roster replaces the roster used by the next program. The current program, if any,
    /// is kept.
    pub fn install_roster(&mut self, horses: Vec<Horse>) {
        info!(no_horses = horses.len(), "roster installed");
        self.horses = horses;
        self.revision += 1;
    }

    // ---------------------------------------------------------------------------------------------
    // COMMANDS ------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// generate_program builds a new program from the roster (generating a roster first if none
    /// exists). Any running round is cancelled and all previous results are discarded.
    pub fn generate_program(&mut self) {
        if let Some(wake_up) = self.wake_up.take() {
            debug!(kind = ?wake_up.kind, "cancelled pending wake-up");
        }
        self.race = None;

        if self.horses.is_empty() {
            self.horses = generate_roster(self.pars.roster_size, &mut self.rng);
            info!(no_horses = self.horses.len(), "generated roster");
        }

        let program = generate_program(
            &self.horses,
            &self.pars.distances,
            self.pars.horses_per_round,
            &mut self.rng,
        );

        self.reset();
        info!(no_rounds = program.len(), "generated race program");
        self.program = Some(program);
        self.revision += 1;
    }

    /// toggle_race starts, pauses or resumes the program. It is ignored without a program and
    /// once all rounds are completed.
    pub fn toggle_race(&mut self) {
        if self.program.is_none() {
            debug!("toggle ignored, no program");
            return;
        }
        if self.all_rounds_completed() {
            debug!("toggle ignored, all rounds completed");
            return;
        }

        self.revision += 1;

        if self.is_racing {
            self.is_racing = false;
            info!(round = self.current_round + 1, "paused");
            return;
        }

        self.is_racing = true;
        if self.round_in_flight {
            info!(round = self.current_round + 1, "resumed");
        } else {
            info!(round = self.current_round + 1, "racing started");
            self.round_in_flight = true;
            self.run_rounds();
        }
    }

    /// advance moves the virtual clock forward by `dt_ms` and fires every wake-up that falls due
    /// within that window, in order.
    pub fn advance(&mut self, dt_ms: u64) {
        let target_ms = self.now_ms + dt_ms;

        while let Some(wake_up) = self.wake_up {
            if wake_up.at_ms > target_ms {
                break;
            }
            self.now_ms = wake_up.at_ms;
            self.wake_up = None;
            self.fire(wake_up.kind);
        }

        self.now_ms = target_ms;
    }

    // ---------------------------------------------------------------------------------------------
    // ROUND LOOP ----------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn reset(&mut self) {
        self.results.clear();
        self.current_round = 0;
        self.is_racing = false;
        self.round_in_flight = false;
        self.positions.clear();
    }

    fn schedule(&mut self, kind: WakeKind, delay_ms: u64) {
        self.wake_up = Some(WakeUp {
            at_ms: self.now_ms + delay_ms,
            kind,
        });
    }

    fn fire(&mut self, kind: WakeKind) {
        let changed = match kind {
            WakeKind::Tick => self.handle_tick(),
            WakeKind::FinishHold => {
                self.handle_finish_hold();
                true
            }
            WakeKind::InterRoundDelay => {
                self.run_rounds();
                true
            }
        };
        if changed {
            self.revision += 1;
        }
    }

    /// run_rounds starts the round at `current_round` unless racing was paused in the meantime,
    /// in which case the round loop ends.
    fn run_rounds(&mut self) {
        let race_round = match self.get_round_to_start() {
            Some(race_round) => race_round,
            None => {
                self.finish_round_loop();
                return;
            }
        };

        info!(
            round = race_round.round,
            distance = race_round.distance,
            "round started"
        );
        let race = Race::new(&race_round, self.pars.get_tot_no_ticks(), &mut self.rng);

        if race.is_empty() {
            self.complete_round(race);
        } else {
            self.positions = race.get_positions();
            self.race = Some(race);
            self.schedule(WakeKind::Tick, self.pars.tick_interval_ms);
        }
    }

    fn get_round_to_start(&self) -> Option<RaceRound> {
        if !self.is_racing {
            return None;
        }
        self.program
            .as_ref()
            .and_then(|program| program.get(self.current_round))
            .cloned()
    }

    /// handle_tick returns true if the published positions changed. A paused tick changes
    /// nothing.
    fn handle_tick(&mut self) -> bool {
        let racing = self.is_racing;
        let race = match self.race.as_mut() {
            Some(race) => race,
            None => return false,
        };

        let moved = race.simulate_tick(racing, &mut self.rng);
        if moved {
            self.positions = race.get_positions();
        }

        if race.status == RaceStatus::AtFinishLine {
            debug!(round = race.round, tick = race.cur_tick, "all horses at the finish line");
            self.schedule(WakeKind::FinishHold, self.pars.finish_hold_ms);
        } else {
            self.schedule(WakeKind::Tick, self.pars.tick_interval_ms);
        }
        moved
    }

    fn handle_finish_hold(&mut self) {
        if let Some(race) = self.race.take() {
            self.complete_round(race);
        }
    }

    fn complete_round(&mut self, race: Race) {
        self.positions.clear();
        let result = race.into_round_result(get_timestamp());
        info!(
            round = result.round,
            winner = result.winner().map(|w| w.horse.name.as_str()).unwrap_or("-"),
            "round finished"
        );
        self.results.push(result);

        if self.results.len() < self.get_no_rounds() {
            self.current_round = self.results.len();
            self.schedule(WakeKind::InterRoundDelay, self.pars.inter_round_delay_ms);
        } else {
            self.finish_round_loop();
        }
    }

    fn finish_round_loop(&mut self) {
        self.round_in_flight = false;
        self.is_racing = false;

        if self.all_rounds_completed() {
            self.current_round = self.get_no_rounds();
            info!(no_rounds = self.results.len(), "all rounds completed");
        }
    }

    // ---------------------------------------------------------------------------------------------
    // QUERIES -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// current_round_data returns the round at `current_round`, if it exists.
    pub fn current_round_data(&self) -> Option<&RaceRound> {
        self.program
            .as_ref()
            .and_then(|program| program.get(self.current_round))
    }

    pub fn all_rounds_completed(&self) -> bool {
        match &self.program {
            Some(program) => !program.is_empty() && self.results.len() >= program.len(),
            None => false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.program.is_none() {
            SessionPhase::Idle
        } else if self.all_rounds_completed() {
            SessionPhase::Completed
        } else if self.is_racing {
            SessionPhase::Racing
        } else if self.results.is_empty() && !self.round_in_flight {
            SessionPhase::ProgramReady
        } else {
            SessionPhase::Paused
        }
    }

    pub fn get_no_rounds(&self) -> usize {
        self.program.as_ref().map(|p| p.len()).unwrap_or(0)
    }

    /// next_wake_up_in returns the time (ms) until the next pending wake-up.
    pub fn next_wake_up_in(&self) -> Option<u64> {
        self.wake_up
            .map(|wake_up| wake_up.at_ms.saturating_sub(self.now_ms))
    }

    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    pub fn program(&self) -> Option<&RaceProgram> {
        self.program.as_ref()
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn is_racing(&self) -> bool {
        self.is_racing
    }

    pub fn round_in_flight(&self) -> bool {
        self.round_in_flight
    }

    pub fn positions(&self) -> &[HorsePosition] {
        &self.positions
    }

    pub fn current_race(&self) -> Option<&Race> {
        self.race.as_ref()
    }

    pub fn pars(&self) -> &GamePars {
        &self.pars
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// revision is incremented on every state change, such that observers can skip unchanged
    /// states.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

fn get_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
