use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "HS-TD",
    about = "A tick-driven horse race program simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing
    #[clap(short, long)]
    pub debug: bool,

    /// Activate the interactive terminal view - rounds will be animated in real-time
    #[clap(short, long)]
    pub interactive: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of simulated programs (only for non-interactive mode); more than one run prints
    /// aggregated horse statistics instead of single results
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the game parameter file (OPTIONAL: if not set, the standard six-round program
    /// is used)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set path to a roster file (OPTIONAL: if not set, a random roster is generated)
    #[clap(long)]
    pub roster_path: Option<PathBuf>,

    /// Set real-time factor (only relevant in interactive mode)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set seed of the random number generator (OPTIONAL: if not set, a random seed is used)
    #[clap(short, long)]
    pub seed: Option<u64>,

    /// Set path of a CSV file the round results are written to (only for non-interactive mode)
    #[clap(short, long)]
    pub export_path: Option<PathBuf>,
}
