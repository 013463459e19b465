//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::DeviceRole;
use std::path::PathBuf;

/// Phase Analyzer - antiphase timing analysis for paired bilateral devices
#[derive(Parser, Debug)]
#[command(
    name = "phase-analyzer",
    author,
    version,
    about = "Bilateral phase timing analysis of paired device logs",
    long_about = "Reads the serial logs of a leader (SERVER) and a follower (CLIENT) device,\n\
                  pairs their activation cycles, measures the follower's deviation from the\n\
                  ideal antiphase target and correlates poor timing with link quality."
)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "PHASE_ANALYZER_VERBOSE"
    )]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "PHASE_ANALYZER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pair leader and follower logs and report phase timing
    Analyze(AnalyzeArgs),

    /// Show what the extractor finds in a single log
    Extract(ExtractArgs),

    /// Validate an analysis configuration file
    Validate(ValidateArgs),
}

/// Options shared by commands that run the extractor
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Analysis configuration file (TOML or JSON)
    #[arg(short, long, env = "PHASE_ANALYZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep every activation trigger instead of collapsing same-tick duplicates
    #[arg(long, env = "PHASE_ANALYZER_NO_DEDUP")]
    pub no_dedup: bool,

    /// Also pair and classify events the aligner skips
    #[arg(long, env = "PHASE_ANALYZER_PAIR_SKIPPED")]
    pub pair_skipped: bool,

    /// Override the GOOD threshold (ms)
    #[arg(long, env = "PHASE_ANALYZER_GOOD_MS")]
    pub good_ms: Option<i64>,

    /// Override the WARNING threshold (ms)
    #[arg(long, env = "PHASE_ANALYZER_WARNING_MS")]
    pub warning_ms: Option<i64>,
}

/// Arguments for the `analyze` command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Leader (SERVER) device log
    pub leader_log: PathBuf,

    /// Follower (CLIENT) device log
    pub follower_log: PathBuf,

    #[command(flatten)]
    pub options: AnalysisOptions,

    /// Maximum number of pair rows to print (0 = all)
    #[arg(long, default_value = "0", env = "PHASE_ANALYZER_MAX_ROWS")]
    pub max_rows: usize,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `extract` command
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// Device log to extract
    pub log: PathBuf,

    /// Stream the log belongs to (leader/server or follower/client)
    #[arg(short, long)]
    pub role: DeviceRole,

    #[command(flatten)]
    pub options: AnalysisOptions,

    /// Number of activations and metric samples to list
    #[arg(long, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "analysis.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
