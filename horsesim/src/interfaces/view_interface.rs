use crate::core::horse::Horse;
use crate::core::orchestrator::{Orchestrator, SessionPhase};
use crate::core::program::RaceRound;
use crate::post::race_result::RoundResult;
use anyhow::Context;
use serde::Serialize;

/// Command is sent by the presentation layer to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GenerateProgram,
    ToggleRace,
    Quit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn from_hex(color: &str) -> anyhow::Result<RgbColor> {
        let tmp_color = color
            .parse::<css_color_parser::Color>()
            .context(format!("Could not parse hex color {:?}!", color))?;
        Ok(RgbColor {
            r: tmp_color.r,
            g: tmp_color.g,
            b: tmp_color.b,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HorseState {
    pub horse_id: u32,
    pub name: String,
    pub lane: u32,
    pub color: RgbColor,
    pub position: f64,
    pub race_prog: f64,
}

/// LiveRound describes the round that is currently animated.
#[derive(Debug, Clone, Serialize)]
pub struct LiveRound {
    pub round: u32,
    pub distance: u32,
    pub cur_tick: u32,
    pub tot_no_ticks: u32,
    pub horse_states: Vec<HorseState>,
}

/// SessionSnapshot is a read-only copy of the session state for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub revision: u64,
    pub phase: SessionPhase,
    pub horses: Vec<Horse>,
    pub program: Vec<RaceRound>,
    pub results: Vec<RoundResult>,
    pub current_round: usize,
    pub is_racing: bool,
    pub round_in_flight: bool,
    pub live_round: Option<LiveRound>,
}

impl SessionSnapshot {
    pub fn from_orchestrator(orchestrator: &Orchestrator) -> anyhow::Result<SessionSnapshot> {
        let live_round = match orchestrator.current_race() {
            Some(race) if !orchestrator.positions().is_empty() => {
                let mut horse_states = Vec::with_capacity(orchestrator.positions().len());

                for horse_pos in orchestrator.positions().iter() {
                    horse_states.push(HorseState {
                        horse_id: horse_pos.horse_id,
                        name: horse_pos.name.to_owned(),
                        lane: horse_pos.lane,
                        color: RgbColor::from_hex(&horse_pos.color)?,
                        position: horse_pos.position,
                        race_prog: horse_pos.race_prog,
                    });
                }

                Some(LiveRound {
                    round: race.round,
                    distance: race.distance,
                    cur_tick: race.cur_tick,
                    tot_no_ticks: race.tot_no_ticks,
                    horse_states,
                })
            }
            _ => None,
        };

        Ok(SessionSnapshot {
            revision: orchestrator.revision(),
            phase: orchestrator.phase(),
            horses: orchestrator.horses().to_vec(),
            program: orchestrator
                .program()
                .map(|program| program.rounds().to_vec())
                .unwrap_or_default(),
            results: orchestrator.results().to_vec(),
            current_round: orchestrator.current_round(),
            is_racing: orchestrator.is_racing(),
            round_in_flight: orchestrator.round_in_flight(),
            live_round,
        })
    }
}
