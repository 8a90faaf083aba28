//! Console error types with miette diagnostics.
//!
//! Everything mid-session resolves to a printed usage message or an empty
//! aggregation; these errors cover what can actually kill the process —
//! bad invocation, bad config, no socket.

use miette::Diagnostic;
use thiserror::Error;

use crosstalk_config::ConfigError;
use crosstalk_core::IdentityError;
use crosstalk_net::NetError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NETWORK: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("{message}")]
    #[diagnostic(
        code(crosstalk::usage),
        help("Run with no -c flag and type 'help' for the command table.")
    )]
    Usage { message: String },

    #[error("invalid talker name '{name}'")]
    #[diagnostic(
        code(crosstalk::name),
        help("Names must not be empty, all digits, '*', or 'here'.")
    )]
    Name {
        name: String,
        #[source]
        source: IdentityError,
    },

    #[error("could not load configuration")]
    #[diagnostic(
        code(crosstalk::config),
        help("Check {path} and any CROSSTALK_* environment variables.")
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("broadcast socket unavailable")]
    #[diagnostic(
        code(crosstalk::net),
        help(
            "Another process may hold the port without SO_REUSEADDR.\n\
             Try a different one: crosstalk --port <n>"
        )
    )]
    Net(#[from] NetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } | Self::Name { .. } => exit_code::USAGE,
            Self::Config { .. } => exit_code::CONFIG,
            Self::Net(_) => exit_code::NETWORK,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}
