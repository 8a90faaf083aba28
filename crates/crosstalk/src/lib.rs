//! The crosstalk operator console.
//!
//! Library side of the `crosstalk` binary: the command-line grammar, the
//! dispatch console (send one request, collect replies until the window
//! closes), and the renderers. Split out as a library so the integration
//! tests can drive a real console over the in-process hub.

pub mod cli;
pub mod console;
pub mod error;
pub mod output;
pub mod parse;
pub mod repl;

pub use console::{Console, ConsoleOptions};
pub use error::CliError;
