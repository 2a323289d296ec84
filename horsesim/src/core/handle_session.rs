use crate::core::orchestrator::Orchestrator;
use crate::interfaces::view_interface::{Command, SessionSnapshot};
use crate::post::race_result::RoundResult;
use anyhow::Context;
use flume::{Receiver, Sender, TryRecvError};
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// handle_session runs the session in real-time for an interactive presentation layer. Commands
/// are read from `rx`, a snapshot is sent on `tx` whenever the state changed. The session ends on
/// `Command::Quit` or when the command channel is disconnected.
pub fn handle_session(
    orchestrator: &mut Orchestrator,
    tx: &Sender<SessionSnapshot>,
    rx: &Receiver<Command>,
    realtime_factor: f64,
) -> anyhow::Result<()> {
    let timestep_ms = orchestrator.pars().tick_interval_ms;
    let mut last_sent_revision = None;

    loop {
        let t_start = Instant::now();

        // handle commands issued since the last time step
        loop {
            match rx.try_recv() {
                Ok(Command::GenerateProgram) => orchestrator.generate_program(),
                Ok(Command::ToggleRace) => orchestrator.toggle_race(),
                Ok(Command::Quit) => {
                    info!("session ended by the presentation layer");
                    return Ok(());
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("command channel disconnected, ending session");
                    return Ok(());
                }
            }
        }

        orchestrator.advance(timestep_ms);

        // send current session state
        if last_sent_revision != Some(orchestrator.revision()) {
            let snapshot = SessionSnapshot::from_orchestrator(orchestrator)?;
            tx.send(snapshot)
                .context("Failed to send session snapshot to the presentation layer!")?;
            last_sent_revision = Some(orchestrator.revision());
        }

        // sleep until time step is finished in real-time as well (calculation in ms)
        let t_sleep = (timestep_ms as f64 / realtime_factor) as i64
            - t_start.elapsed().as_millis() as i64;

        if t_sleep > 0 {
            sleep(Duration::from_millis(t_sleep as u64));
        } else {
            warn!("could not keep up with real-time");
        }
    }
}

/// handle_session_headless generates a program if none exists, races it to completion on the
/// virtual clock without any waiting, and returns the results.
pub fn handle_session_headless(
    orchestrator: &mut Orchestrator,
    print_debug: bool,
) -> anyhow::Result<Vec<RoundResult>> {
    if orchestrator.program().is_none() {
        orchestrator.generate_program();
    }
    orchestrator.toggle_race();

    let mut no_results_printed = 0;
    while orchestrator.round_in_flight() {
        let dt_ms = orchestrator
            .next_wake_up_in()
            .ok_or_else(|| anyhow::anyhow!("Round loop is in flight without a pending wake-up!"))?;
        orchestrator.advance(dt_ms);

        if print_debug && orchestrator.results().len() > no_results_printed {
            no_results_printed = orchestrator.results().len();
            debug!(
                virtual_time_ms = orchestrator.now_ms(),
                no_results = no_results_printed,
                "round resolved"
            );
        }
    }

    Ok(orchestrator.results().to_vec())
}
