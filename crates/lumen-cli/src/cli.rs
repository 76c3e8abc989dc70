//! CLI argument definitions.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lumen",
    version,
    about = "Incremental parallel build driver for the Lumen compiler"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the project, reusing cached interfaces where possible
    Build {
        /// Number of parallel compile jobs (defaults to CPU count)
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Print a phase timing breakdown after the build
        #[arg(long)]
        timings: bool,
        /// Suppress non-error output
        #[arg(short, long)]
        quiet: bool,
        /// Path to the lumenc compiler binary
        #[arg(long)]
        compiler: Option<PathBuf>,
    },

    /// Remove the lumen-stuff directory
    Clean {
        /// Suppress non-error output
        #[arg(short, long)]
        quiet: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
