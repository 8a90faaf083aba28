//! Clap derive structures for the `crosstalk` console.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crosstalk_core::DuplicatePolicy;

/// crosstalk -- talk to every device on the broadcast domain at once
#[derive(Debug, Parser)]
#[command(
    name = "crosstalk",
    version,
    about = "Broadcast command console for embedded devices",
    long_about = "An interactive console that addresses one, many, or all\n\
        network-attached devices over UDP broadcast and aggregates their\n\
        JSON replies within a bounded collection window."
)]
pub struct Cli {
    /// Broadcast port shared by every participant
    #[arg(long, short = 'p', env = "CROSSTALK_PORT")]
    pub port: Option<u16>,

    /// Collection window in milliseconds
    #[arg(long, short = 'w', env = "CROSSTALK_WINDOW_MS", value_name = "MS")]
    pub window_ms: Option<u64>,

    /// What to do with duplicate replies inside one window
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatesOpt>,

    /// Talker name announced to peers (default: generated)
    #[arg(long)]
    pub name: Option<String>,

    /// Config file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for aggregations
    #[arg(long, short = 'o', default_value = "text")]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Run a single command line and exit
    #[arg(long, short = 'c', value_name = "LINE")]
    pub command: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text, one responder per line (default, interactive)
    Text,
    /// Pretty-printed JSON array
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Color if stdout is an interactive terminal
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DuplicatesOpt {
    First,
    Last,
}

impl From<DuplicatesOpt> for DuplicatePolicy {
    fn from(opt: DuplicatesOpt) -> Self {
        match opt {
            DuplicatesOpt::First => Self::First,
            DuplicatesOpt::Last => Self::Last,
        }
    }
}
