//! Protocol core for crosstalk: a broadcast command-and-reply protocol for
//! heterogeneous embedded devices sharing one datagram medium.
//!
//! This crate owns everything that is pure protocol — no sockets, no tasks:
//!
//! - **Domain model** ([`model`]) — [`Identity`] (fixed name, mutable
//!   channel group), [`TargetSelector`] addressing modes, and the immutable
//!   per-device [`Manifesto`] self-description.
//!
//! - **Messages** ([`message`]) — typed [`Request`] / [`Response`] values
//!   and the [`Verb`] command set.
//!
//! - **Codec** ([`codec`]) — the compact-JSON wire format. Encoding is
//!   total; decoding validates shape, verb, and arguments, and classifies
//!   datagrams as requests or responses. Broadcast noise decodes to
//!   [`DecodeError`] and is dropped by callers, never surfaced.
//!
//! - **Addressing resolver** ([`resolve`]) — the pure predicate deciding
//!   whether a selector addresses a given identity.
//!
//! - **Device agent** ([`agent`]) — a synchronous state machine dispatching
//!   accepted requests to a fixed capability table. Drivers own the I/O and
//!   apply the agent's [`Reaction`].
//!
//! - **Aggregation** ([`collect`]) — the console-side pending collection:
//!   arrival-ordered, deduplicated by responder identity, bounded by a
//!   deadline its driver enforces.

pub mod agent;
pub mod codec;
pub mod collect;
pub mod error;
pub mod message;
pub mod model;
pub mod registry;
pub mod resolve;

// ── Primary re-exports ──────────────────────────────────────────────
pub use agent::{DeviceAgent, Reaction};
pub use codec::{Decoded, decode, encode_request, encode_response};
pub use collect::{DuplicatePolicy, PendingCollection};
pub use error::DecodeError;
pub use message::{ACK_LITERAL, Request, Response, ResultValue, Verb, VerbWord};
pub use model::{
    CapabilityKind, DEFAULT_CHANNEL, Identity, IdentityError, LOCAL_LITERAL, Manifesto,
    ManifestoEntry, TargetSelector, WILDCARD,
};
pub use registry::{Capabilities, CapabilitiesBuilder};
pub use resolve::resolves;
