mod render;

use anyhow::Context;
use clap::Parser;
use horsesim::core::handle_session::{handle_session, handle_session_headless};
use horsesim::core::horse::Horse;
use horsesim::core::orchestrator::Orchestrator;
use horsesim::core::roster::generate_roster;
use horsesim::interfaces::view_interface::Command;
use horsesim::post::horse_stats::{format_horse_stats, StatsTable};
use horsesim::post::race_result::{print_round_results, write_results_csv};
use horsesim::pre::read_sim_pars::{read_game_pars, read_roster, GamePars};
use horsesim::pre::sim_opts::SimOpts;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use render::TrackView;
use std::io::BufRead;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "g" | "G" => Some(Command::GenerateProgram),
        "" | "t" | "T" => Some(Command::ToggleRace),
        "q" | "Q" => Some(Command::Quit),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    // set up logging, RUST_LOG overrides the default level
    let default_level = if sim_opts.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(default_level.parse().context(
                "Failed to parse default log directive!",
            )?),
        )
        .init();

    if sim_opts.realtime_factor <= 0.0 {
        anyhow::bail!("Real-time factor must be positive!");
    }

    // get game parameters
    let game_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        info!(path = ?parfile_path, "reading game parameters");
        read_game_pars(parfile_path)?
    } else {
        GamePars::default()
    };
    game_pars.validate()?;

    // get roster
    let roster: Option<Vec<Horse>> = if let Some(roster_path) = &sim_opts.roster_path {
        info!(path = ?roster_path, "reading roster");
        let horses = read_roster(roster_path)?;
        game_pars.check_roster_size(&horses)?;
        Some(horses)
    } else {
        None
    };

    info!(
        no_rounds = game_pars.distances.len(),
        horses_per_round = game_pars.horses_per_round,
        "simulating race program"
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.interactive && sim_opts.no_sim_runs == 1 {
        // NON-INTERACTIVE CASE (SINGLE RUN) -------------------------------------------------------
        let t_start = Instant::now();

        let mut orchestrator = Orchestrator::new(game_pars, create_rng(sim_opts.seed));
        if let Some(horses) = roster {
            orchestrator.install_roster(horses);
        }
        let results = handle_session_headless(&mut orchestrator, sim_opts.debug)?;

        info!(execution_time_ms = t_start.elapsed().as_millis() as u64, "program finished");

        print_round_results(&results)?;

        if let Some(export_path) = &sim_opts.export_path {
            let path = write_results_csv(&results, export_path)?;
            info!(path = %path, "results written");
        }
    } else if !sim_opts.interactive {
        // NON-INTERACTIVE CASE (MULTIPLE RUNS) ----------------------------------------------------
        if sim_opts.export_path.is_some() {
            warn!("export path is ignored when more than one program is simulated");
        }

        // all runs share one roster so that statistics can be aggregated per horse
        let mut horses = match roster {
            Some(horses) => horses,
            None => generate_roster(game_pars.roster_size, &mut create_rng(sim_opts.seed)),
        };
        let base_seed = sim_opts.seed.unwrap_or_else(rand::random);

        let t_start = Instant::now();

        let stats = (0..sim_opts.no_sim_runs)
            .into_par_iter()
            .map(|run_idx| -> anyhow::Result<StatsTable> {
                let rng = StdRng::seed_from_u64(base_seed.wrapping_add(run_idx as u64 + 1));
                let mut orchestrator = Orchestrator::new(game_pars.clone(), rng);
                orchestrator.install_roster(horses.clone());
                let results = handle_session_headless(&mut orchestrator, false)?;

                let mut stats = StatsTable::new();
                stats.record_results(&results);
                Ok(stats)
            })
            .try_reduce(StatsTable::new, |a, b| Ok(a.merge(b)))?;

        info!(
            no_programs = sim_opts.no_sim_runs,
            execution_time_ms = t_start.elapsed().as_millis() as u64,
            "all programs finished"
        );

        stats.apply_to(&mut horses);
        print!("{}", format_horse_stats(&horses)?);
    } else {
        // INTERACTIVE CASE ------------------------------------------------------------------------
        info!("starting interactive session");

        // the session sends snapshots, the terminal sends commands
        let (tx_snapshot, rx_snapshot) = flume::unbounded();
        let (tx_command, rx_command) = flume::unbounded();

        let realtime_factor = sim_opts.realtime_factor;
        let rng = create_rng(sim_opts.seed);
        let session = thread::spawn(move || -> anyhow::Result<()> {
            let mut orchestrator = Orchestrator::new(game_pars, rng);
            if let Some(horses) = roster {
                orchestrator.install_roster(horses);
            }
            handle_session(&mut orchestrator, &tx_snapshot, &rx_command, realtime_factor)
        });

        // stdin is read in its own thread since reading blocks
        let _ = thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                if let Some(command) = parse_command(&line) {
                    let quit = command == Command::Quit;
                    if tx_command.send(command).is_err() || quit {
                        break;
                    }
                }
            }
        });

        println!("{}", render::HELP_LINE);

        // draw every snapshot until the session ends
        let mut track_view = TrackView::new();
        for snapshot in rx_snapshot.iter() {
            track_view.draw(&snapshot)?;
        }

        match session.join() {
            Ok(result) => result?,
            Err(_) => anyhow::bail!("Session thread panicked!"),
        }
        info!(
            no_results = track_view.get_no_results_shown(),
            "interactive session ended"
        );
    }

    Ok(())
}
