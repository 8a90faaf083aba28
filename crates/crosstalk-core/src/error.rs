// ── Protocol error taxonomy ──
//
// Nothing here is fatal to a device or the console. Decode failures are
// dropped where they arise (broadcast noise is expected); the reason
// constants travel to peers inside structured Error results, so their
// wording is part of the wire contract and must stay stable.

use thiserror::Error;

pub use crate::model::IdentityError;

/// Error-result reason for an unknown `run`/`get`/`set` capability key.
pub const ERR_UNKNOWN_FUNCTION: &str = "unknown function";

/// Error-result reason for a channel outside `0..=u32::MAX`.
pub const ERR_INVALID_CHANNEL: &str = "invalid channel";

/// Error-result reason for a port outside `1..=65535`.
pub const ERR_INVALID_PORT: &str = "invalid port";

/// Why a datagram failed to decode.
///
/// Callers drop the datagram and move on; none of these are surfaced to
/// an operator. They are distinguished mostly for trace logs and tests.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a well-formed JSON object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("object is neither a request nor a response")]
    UnknownShape,

    #[error("unknown verb '{0}'")]
    UnknownVerb(String),

    #[error("verb '{verb}' requires an argument")]
    MissingArgument { verb: &'static str },

    #[error("verb '{verb}' argument '{value}' is not an integer")]
    NonNumericArgument { verb: &'static str, value: String },

    #[error("invalid target selector '{0}'")]
    InvalidTarget(String),

    #[error("invalid peer identity: {0}")]
    InvalidIdentity(#[from] IdentityError),
}
