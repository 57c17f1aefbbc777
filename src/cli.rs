//! CLI argument parsing.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ai-speedup")]
#[command(version)]
#[command(
    about = "Estimate the effect of AI tool access on task completion time",
    long_about = None
)]
pub struct Cli {
    /// Observation table (CSV with one header row)
    #[arg(long = "input-data", value_name = "PATH")]
    pub input_data: PathBuf,

    /// Print diagnostics (row filtering, fit summary, standard errors) to stderr
    #[arg(long)]
    pub debug: bool,
}
