// ── Identity and addressing ──
//
// Identity is the foundation of the whole protocol: every device carries
// exactly one, and every request names its destination(s) through a
// TargetSelector resolved against it.

use std::fmt;

use thiserror::Error;

/// Wildcard selector token, on the wire and in the console grammar.
pub const WILDCARD: &str = "*";

/// Console-reserved selector for the console's own placeholder device.
/// Resolved locally by the console, never over the wire.
pub const LOCAL_LITERAL: &str = "here";

/// The channel every device starts on.
pub const DEFAULT_CHANNEL: u32 = 0;

/// A device's wire identity: a fixed name plus a mutable channel group.
///
/// The name is fixed for the device's lifetime; the channel can be
/// retargeted at runtime (`channel <n>`) to regroup devices without
/// renaming them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    name: String,
    channel: u32,
}

impl Identity {
    /// Create an identity, rejecting names that could never be addressed.
    ///
    /// A name that is empty, the wildcard token, the console-local literal,
    /// or all decimal digits (which the selector grammar reads as a channel
    /// number) is refused here rather than left silently unreachable.
    pub fn new(name: impl Into<String>, channel: u32) -> Result<Self, IdentityError> {
        let name = name.into();
        if name.is_empty() {
            return Err(IdentityError::Empty);
        }
        if name == WILDCARD || name == LOCAL_LITERAL {
            return Err(IdentityError::Reserved(name));
        }
        if name.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentityError::Numeric(name));
        }
        Ok(Self { name, channel })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Retarget the channel. Only the owning agent calls this, between
    /// datagrams, so per-device sequential consistency holds by construction.
    pub(crate) fn set_channel(&mut self, channel: u32) {
        self.channel = channel;
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Error constructing an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("device name cannot be empty")]
    Empty,
    #[error("device name '{0}' is a reserved token")]
    Reserved(String),
    #[error("device name '{0}' would be read as a channel number")]
    Numeric(String),
}

// ── TargetSelector ──────────────────────────────────────────────────

/// How a request names its destination(s): one device by name, a channel
/// group, or everyone on the medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    ByName(String),
    ByChannel(u32),
    All,
}

impl TargetSelector {
    /// Parse a selector token: `*` is everyone, all-decimal-digits is a
    /// channel, anything else non-empty is a name. Returns `None` for an
    /// empty token or a digit run too large for a channel.
    pub fn parse(token: &str) -> Option<Self> {
        if token == WILDCARD {
            return Some(Self::All);
        }
        if token.is_empty() {
            return None;
        }
        if token.bytes().all(|b| b.is_ascii_digit()) {
            return token.parse().ok().map(Self::ByChannel);
        }
        Some(Self::ByName(token.to_owned()))
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "{name}"),
            Self::ByChannel(channel) => write!(f, "{channel}"),
            Self::All => write!(f, "{WILDCARD}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn identity_accepts_ordinary_names() {
        let id = Identity::new("Nano", 0).unwrap();
        assert_eq!(id.name(), "Nano");
        assert_eq!(id.channel(), DEFAULT_CHANNEL);
    }

    #[test]
    fn identity_rejects_empty_name() {
        assert_eq!(Identity::new("", 0), Err(IdentityError::Empty));
    }

    #[test]
    fn identity_rejects_reserved_tokens() {
        assert!(matches!(
            Identity::new("*", 0),
            Err(IdentityError::Reserved(_))
        ));
        assert!(matches!(
            Identity::new("here", 0),
            Err(IdentityError::Reserved(_))
        ));
    }

    #[test]
    fn identity_rejects_numeric_names() {
        assert!(matches!(
            Identity::new("42", 0),
            Err(IdentityError::Numeric(_))
        ));
        // Mixed alphanumerics are fine.
        assert!(Identity::new("ESP66", 0).is_ok());
    }

    #[test]
    fn selector_parses_wildcard() {
        assert_eq!(TargetSelector::parse("*"), Some(TargetSelector::All));
    }

    #[test]
    fn selector_parses_digits_as_channel() {
        assert_eq!(
            TargetSelector::parse("11"),
            Some(TargetSelector::ByChannel(11))
        );
    }

    #[test]
    fn selector_parses_names() {
        assert_eq!(
            TargetSelector::parse("Nano"),
            Some(TargetSelector::ByName("Nano".into()))
        );
    }

    #[test]
    fn selector_rejects_empty_and_overflow() {
        assert_eq!(TargetSelector::parse(""), None);
        assert_eq!(TargetSelector::parse("99999999999999999999"), None);
    }

    #[test]
    fn selector_round_trips_through_display() {
        for token in ["*", "7", "Nano"] {
            let selector = TargetSelector::parse(token).unwrap();
            assert_eq!(selector.to_string(), token);
        }
    }
}
