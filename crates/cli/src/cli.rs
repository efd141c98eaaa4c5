//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fanout-tee - duplicate standard input to standard output and files
#[derive(Parser, Debug)]
#[command(
    name = "fanout-tee",
    author,
    version,
    about = "Copy standard input to standard output and every given output",
    long_about = "A tee(1) built on a dynamic fan-out writer.\n\n\
                  Every chunk read from stdin is written to each output in order. \n\
                  The first output that fails stops the run with a non-zero exit."
)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FANOUT_TEE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all logs except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "FANOUT_TEE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy stdin to stdout and the given outputs
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Files to write to, in addition to stdout
    pub files: Vec<PathBuf>,

    /// Append to the given files instead of truncating them
    #[arg(short, long)]
    pub append: bool,

    /// Ignore interrupt signals (Ctrl-C)
    #[arg(short, long)]
    pub ignore_interrupts: bool,

    /// Optional configuration file (TOML or JSON) with extra outputs
    #[arg(short, long, env = "FANOUT_TEE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read chunk size in bytes (overrides configuration)
    #[arg(long, env = "FANOUT_TEE_BUFFER_SIZE")]
    pub buffer_size: Option<usize>,

    /// Do not write to stdout
    #[arg(long)]
    pub no_stdout: bool,

    /// Print the resolved outputs and exit without copying
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "tee.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}
