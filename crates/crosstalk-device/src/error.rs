//! Daemon startup errors. Once the loop is running nothing is fatal:
//! noise is dropped, failed sends are logged, failed rebinds keep the
//! old binding.

use miette::Diagnostic;
use thiserror::Error;

use crosstalk_config::ConfigError;
use crosstalk_core::IdentityError;
use crosstalk_net::NetError;

#[derive(Debug, Error, Diagnostic)]
pub enum DaemonError {
    #[error("a device name is required")]
    #[diagnostic(
        code(crosstalk_device::name),
        help("Pass --name <NAME> or set [device] name in the config file.")
    )]
    NameRequired,

    #[error("invalid device identity")]
    #[diagnostic(
        code(crosstalk_device::identity),
        help("Names must not be empty, all digits, '*', or 'here'.")
    )]
    Identity(#[from] IdentityError),

    #[error("could not load configuration")]
    #[diagnostic(
        code(crosstalk_device::config),
        help("Check {path} and any CROSSTALK_* environment variables.")
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("broadcast socket unavailable")]
    #[diagnostic(
        code(crosstalk_device::net),
        help("Try a different port: crosstalk-device --port <n>")
    )]
    Net(#[from] NetError),
}

impl DaemonError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NameRequired | Self::Identity(_) => 2,
            Self::Config { .. } => 3,
            Self::Net(_) => 7,
        }
    }
}
