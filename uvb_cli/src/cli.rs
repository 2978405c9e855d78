//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "uvb", version, about = "UVB meter on simulated hardware")]
pub struct Cli {
    /// Path to config TOML (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print readouts, summaries and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Boot the meter and tick until power-off, Ctrl-C, or the tick limit
    Run {
        /// Calibrate at boot as if button B were held
        #[arg(long, action = ArgAction::SetTrue)]
        calibrate: bool,
        /// Stop after N ticks (overrides [simulation].max_ticks)
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Print a summary line when the loop ends
        #[arg(long, action = ArgAction::SetTrue)]
        print_summary: bool,
    },
    /// Measure the dark offset and persist it
    Calibrate,
    /// Probe the simulated peripherals and the calibration store
    SelfCheck,
}
