//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: loop forever on the configured interval (default)
//! - once: run a single ingest cycle and exit
//! - show-config: print the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pcpp-worker - Periodic PCPartPicker ingestion worker
#[derive(Parser, Debug)]
#[command(name = "pcpp-worker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the ingest loop until SIGINT/SIGTERM
    Run {
        /// Interval between cycles in seconds (overrides PCPP_INTERVAL_SEC)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Run a single ingest cycle and exit with its status
    Once,

    /// Print the effective configuration as YAML
    ShowConfig,
}
