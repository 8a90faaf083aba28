// ── Requests, responses, and the verb set ──

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DecodeError;
use crate::model::{Identity, ManifestoEntry, TargetSelector};

/// The fixed acknowledgement literal for successfully dispatched `run`
/// and `set` commands, independent of the underlying action's outcome.
pub const ACK_LITERAL: &str = "ROGER";

/// The eight command words that travel on the wire.
///
/// `channel` and `port` each cover a get and a set form, told apart by
/// the presence of an argument; see [`Verb::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VerbWord {
    Talk,
    List,
    Run,
    Set,
    Get,
    Sys,
    Channel,
    Port,
}

/// A fully-decoded command, argument included.
///
/// `ChannelSet` and `PortSet` carry the raw decoded integer: range
/// validation is the agent's job, so an out-of-range value produces a
/// structured `Error` reply instead of a silent drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Talk,
    List,
    ChannelGet,
    ChannelSet(i64),
    Run(String),
    Set { what: String, value: String },
    Get(String),
    Sys,
    PortGet,
    PortSet(i64),
}

impl Verb {
    /// The wire word for this verb.
    pub fn word(&self) -> VerbWord {
        match self {
            Self::Talk => VerbWord::Talk,
            Self::List => VerbWord::List,
            Self::ChannelGet | Self::ChannelSet(_) => VerbWord::Channel,
            Self::Run(_) => VerbWord::Run,
            Self::Set { .. } => VerbWord::Set,
            Self::Get(_) => VerbWord::Get,
            Self::Sys => VerbWord::Sys,
            Self::PortGet | Self::PortSet(_) => VerbWord::Port,
        }
    }

    /// The wire argument for this verb, if any.
    pub fn arg(&self) -> Option<String> {
        match self {
            Self::Talk | Self::List | Self::Sys | Self::ChannelGet | Self::PortGet => None,
            Self::ChannelSet(n) | Self::PortSet(n) => Some(n.to_string()),
            Self::Run(what) | Self::Get(what) => Some(what.clone()),
            Self::Set { what, value } => Some(format!("{what} {value}")),
        }
    }

    /// Rebuild a verb from its wire word and optional argument.
    ///
    /// `talk`/`list`/`sys` ignore any argument. `run`/`get` require one;
    /// `set` requires a name and a value. `channel`/`port` without an
    /// argument are the get form; with one, the argument must parse as an
    /// integer or the whole datagram is refused.
    pub fn from_parts(word: VerbWord, arg: Option<&str>) -> Result<Self, DecodeError> {
        let arg = arg.map(str::trim).filter(|s| !s.is_empty());
        match word {
            VerbWord::Talk => Ok(Self::Talk),
            VerbWord::List => Ok(Self::List),
            VerbWord::Sys => Ok(Self::Sys),
            VerbWord::Run => arg
                .map(|what| Self::Run(what.to_owned()))
                .ok_or(DecodeError::MissingArgument { verb: "run" }),
            VerbWord::Get => arg
                .map(|what| Self::Get(what.to_owned()))
                .ok_or(DecodeError::MissingArgument { verb: "get" }),
            VerbWord::Set => {
                let (what, value) = arg
                    .and_then(|a| a.split_once(char::is_whitespace))
                    .map(|(what, value)| (what, value.trim()))
                    .filter(|(_, value)| !value.is_empty())
                    .ok_or(DecodeError::MissingArgument { verb: "set" })?;
                Ok(Self::Set {
                    what: what.to_owned(),
                    value: value.to_owned(),
                })
            }
            VerbWord::Channel => match arg {
                None => Ok(Self::ChannelGet),
                Some(raw) => raw
                    .parse()
                    .map(Self::ChannelSet)
                    .map_err(|_| DecodeError::NonNumericArgument {
                        verb: "channel",
                        value: raw.to_owned(),
                    }),
            },
            VerbWord::Port => match arg {
                None => Ok(Self::PortGet),
                Some(raw) => raw
                    .parse()
                    .map(Self::PortSet)
                    .map_err(|_| DecodeError::NonNumericArgument {
                        verb: "port",
                        value: raw.to_owned(),
                    }),
            },
        }
    }
}

// ── Request ─────────────────────────────────────────────────────────

/// One operator command on the wire. Immutable once constructed: it is
/// serialized once and may be observed by many devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Correlation id echoed by responders, letting the console discard
    /// stale replies from an earlier collection window.
    pub id: u32,
    pub target: TargetSelector,
    pub verb: Verb,
    pub sender: Identity,
}

impl Request {
    /// Build a request with a fresh correlation id.
    pub fn new(target: TargetSelector, verb: Verb, sender: Identity) -> Self {
        Self {
            id: next_request_id(),
            target,
            verb,
            sender,
        }
    }
}

/// A 32-bit wrapped millisecond timestamp. Uniqueness only needs to hold
/// across the handful of consecutive windows a stale reply could straddle.
pub fn next_request_id() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| (elapsed.as_millis() & 0xFFFF_FFFF) as u32)
        .unwrap_or_default()
}

// ── Response ────────────────────────────────────────────────────────

/// One device's reply to an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Echo of the request's correlation id.
    pub id: u32,
    pub from: Identity,
    /// Echo of the request's verb, so replies are self-describing.
    pub verb: Verb,
    pub result: ResultValue,
}

/// The payload of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultValue {
    /// Fire-and-acknowledge: renders as the literal `ROGER`.
    Ack,
    Text(String),
    /// Structured failure reported back to the sender, e.g.
    /// `unknown function`. Not a local error on either side.
    Error(String),
    /// The `list` reply: the responder's capability tuples.
    Entries(Vec<ManifestoEntry>),
}
