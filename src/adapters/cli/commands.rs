//! CLI Command Definitions
//!
//! clap surface for the quorum engine binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quorum - Ensemble Technical-Analysis Decision Engine
#[derive(Parser, Debug)]
#[command(
    name = "quorum",
    version = env!("CARGO_PKG_VERSION"),
    about = "Ensemble technical-analysis decision engine",
    long_about = "Quorum runs a fixed suite of seven technical-analysis detectors over a \
                  market snapshot and blends their verdicts into one confluence-weighted \
                  trade decision with levels and position sizing."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full pipeline over a snapshot file and print the decision
    Analyze(AnalyzeCmd),

    /// Print the raw per-detector verdict list for a snapshot
    Verdicts(VerdictsCmd),

    /// Validate a configuration file
    CheckConfig(CheckConfigCmd),

    /// Generate a synthetic snapshot file for offline smoke tests
    GenSnapshot(GenSnapshotCmd),
}

/// Analyze one snapshot
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Path to the snapshot JSON file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Pin the local hour (0-23) instead of reading the system clock
    #[arg(long, value_name = "HOUR")]
    pub hour: Option<u32>,

    /// Override the configured account balance
    #[arg(long, value_name = "AMOUNT")]
    pub balance: Option<f64>,

    /// Override the configured risk percent per trade
    #[arg(long, value_name = "PCT")]
    pub risk_percent: Option<f64>,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,
}

/// Print detector verdicts
#[derive(Parser, Debug)]
pub struct VerdictsCmd {
    /// Path to the snapshot JSON file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT", default_value = "text")]
    pub format: String,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct CheckConfigCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Generate a synthetic snapshot
#[derive(Parser, Debug)]
pub struct GenSnapshotCmd {
    /// Output file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Symbol carried by the snapshot
    #[arg(long, value_name = "SYMBOL", default_value = "BTC-USDT")]
    pub symbol: String,

    /// Number of 1m bars in the tape
    #[arg(long, value_name = "COUNT", default_value = "1440")]
    pub bars: usize,

    /// RNG seed; the same seed always produces the same tape
    #[arg(long, value_name = "SEED", default_value = "7")]
    pub seed: u64,

    /// Starting price of the walk
    #[arg(long, value_name = "PRICE", default_value = "100.0")]
    pub start_price: f64,

    /// Append a high-volume breakout over the final 15 minutes
    #[arg(long)]
    pub breakout: bool,
}
