//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

/// Terminal client for the OpenOA Monte Carlo AEP demo.
///
/// Triggers one remote AEP run and shows the summary statistics and the
/// distribution histogram.
///
/// Examples:
///   aep-demo
///   aep-demo --base-url http://localhost:8000 --export aep.csv
///   aep-demo --tui --log-file aep-demo.log
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the AEP service (overrides the config file)
    #[arg(long, value_name = "URL", env = "AEP_DEMO_URL")]
    pub base_url: Option<String>,

    /// Run endpoint path (overrides the config file)
    #[arg(long, value_name = "PATH")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Launch the interactive terminal view instead of a single headless run
    #[arg(long)]
    pub tui: bool,

    /// Write the returned distribution to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Write logs to this file (the TUI is silent otherwise)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parses arguments from the process command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Maximum log level implied by `--verbose` / `--quiet`.
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}
