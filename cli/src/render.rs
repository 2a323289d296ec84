use horsesim::core::orchestrator::SessionPhase;
use horsesim::core::outcome::calc_horse_speed;
use horsesim::interfaces::view_interface::{HorseState, SessionSnapshot};
use std::fmt::Write;

/// Number of characters the straight is drawn with
const TRACK_WIDTH: usize = 60;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RESET_COLOR: &str = "\x1b[0m";

pub const HELP_LINE: &str = "Commands: [g]enerate program, [Enter] start/pause, [q]uit";

/// TrackView renders session snapshots to the terminal.
#[derive(Debug, Default)]
pub struct TrackView {
    no_results_shown: usize,
}

impl TrackView {
    pub fn new() -> TrackView {
        TrackView::default()
    }

    pub fn draw(&mut self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        let frame = self.render(snapshot)?;
        print!("{}{}", CLEAR_SCREEN, frame);
        Ok(())
    }

    pub fn render(&mut self, snapshot: &SessionSnapshot) -> anyhow::Result<String> {
        let mut frame = String::new();

        writeln!(&mut frame, "{}", HELP_LINE)?;
        writeln!(
            &mut frame,
            "Phase: {}, round {}/{}, {} horses in the stable",
            phase_label(snapshot.phase),
            (snapshot.current_round + 1).min(snapshot.program.len().max(1)),
            snapshot.program.len(),
            snapshot.horses.len()
        )?;
        writeln!(&mut frame)?;

        match &snapshot.live_round {
            Some(live_round) => {
                writeln!(
                    &mut frame,
                    "Round {} - {}m (tick {}/{})",
                    live_round.round, live_round.distance, live_round.cur_tick, live_round.tot_no_ticks
                )?;
                for horse_state in live_round.horse_states.iter() {
                    writeln!(&mut frame, "{}", render_lane(horse_state))?;
                }
            }
            None => {
                if let Some(next_round) = snapshot.program.get(snapshot.current_round) {
                    writeln!(
                        &mut frame,
                        "Next: round {} - {}m",
                        next_round.round, next_round.distance
                    )?;
                    let mut rng = rand::thread_rng();
                    for entry in next_round.horses.iter() {
                        writeln!(
                            &mut frame,
                            "{:2} {:20} cond {:3}, est. {:4.1}m/s",
                            entry.lane,
                            entry.horse.name,
                            entry.horse.condition,
                            calc_horse_speed(&entry.horse, &mut rng)
                        )?;
                    }
                }
            }
        }

        writeln!(&mut frame)?;
        for result in snapshot.results.iter() {
            let winner = result
                .winner()
                .map(|w| format!("{} ({:.2}s)", w.horse.name, w.race_time))
                .unwrap_or_else(|| "-".to_owned());
            writeln!(
                &mut frame,
                "Round {} ({}m) won by {} at {}",
                result.round, result.distance, winner, result.completed_at
            )?;
        }
        self.no_results_shown = snapshot.results.len();

        Ok(frame)
    }

    pub fn get_no_results_shown(&self) -> usize {
        self.no_results_shown
    }
}

fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Idle => "no program",
        SessionPhase::ProgramReady => "ready",
        SessionPhase::Racing => "racing",
        SessionPhase::Paused => "paused",
        SessionPhase::Completed => "completed",
    }
}

fn render_lane(horse_state: &HorseState) -> String {
    let covered = ((horse_state.race_prog.clamp(0.0, 1.0)) * TRACK_WIDTH as f64).round() as usize;
    let color = &horse_state.color;

    format!(
        "{:2} |{}\x1b[38;2;{};{};{}m>{}{}| {:20} {:6.1}m",
        horse_state.lane,
        "-".repeat(covered),
        color.r,
        color.g,
        color.b,
        RESET_COLOR,
        " ".repeat(TRACK_WIDTH - covered),
        horse_state.name,
        horse_state.position
    )
}
