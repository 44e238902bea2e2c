//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path used when `--config` is not given. Missing means built-in defaults.
pub const DEFAULT_CONFIG: &str = "etc/wheel_config.toml";

#[derive(Parser, Debug)]
#[command(name = "wheel", version, about = "Cat wheel jackpot feeder")]
pub struct Cli {
    /// Path to config TOML [default: etc/wheel_config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the controller against the sensor until Ctrl-C
    Run {
        /// Seed the jackpot draw (default: OS entropy)
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
        /// Stop on our own after this many milliseconds
        #[arg(long = "for-ms", value_name = "MS")]
        for_ms: Option<u64>,
    },
    /// Replay a steady run in virtual time and print what happened
    Simulate {
        /// Number of sensor pulses
        #[arg(long, default_value_t = 100)]
        pulses: u64,
        /// Spacing between pulses in milliseconds
        #[arg(
            long = "interval-ms",
            value_name = "MS",
            default_value_t = 100,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        interval_ms: u64,
        /// Seed the jackpot draw
        #[arg(long, value_name = "N", default_value_t = 0)]
        seed: u64,
        /// Ignore the operating-hours window
        #[arg(long, action = ArgAction::SetTrue)]
        all_hours: bool,
    },
    /// Validate the config and construct the backends
    SelfCheck,
}
