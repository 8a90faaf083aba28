//! Domain model: identities, addressing selectors, and manifestos.

mod identity;
mod manifesto;

pub use identity::{
    DEFAULT_CHANNEL, Identity, IdentityError, LOCAL_LITERAL, TargetSelector, WILDCARD,
};
pub use manifesto::{CapabilityKind, Manifesto, ManifestoEntry};
