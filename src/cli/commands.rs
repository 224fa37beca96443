//! CLI definition using clap.
//!
//! One positional argument: the iteration budget. Everything else is an
//! override for a config-file value.

use clap::Parser;
use std::path::PathBuf;

/// Drover - bounded supervision loop for unattended CLI agents
#[derive(Parser, Debug)]
#[command(name = "drover")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Maximum number of agent iterations before giving up
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: Option<u32>,

    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the primary instruction document path
    #[arg(long)]
    pub prompt: Option<PathBuf>,

    /// Override the optional context document path
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Override the agent command
    #[arg(long)]
    pub agent: Option<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
