// ── Addressing resolver ──

use crate::model::{Identity, TargetSelector};

/// Whether `selector` addresses a device with `identity`.
///
/// Name matches are case-sensitive and exact; there is no fuzzy matching.
/// A non-match is not an error — on a broadcast medium it is the normal
/// filtering mechanism, and the device drops the request silently.
pub fn resolves(selector: &TargetSelector, identity: &Identity) -> bool {
    match selector {
        TargetSelector::ByName(name) => name == identity.name(),
        TargetSelector::ByChannel(channel) => *channel == identity.channel(),
        TargetSelector::All => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity(name: &str, channel: u32) -> Identity {
        Identity::new(name, channel).unwrap()
    }

    #[test]
    fn own_name_resolves_other_names_do_not() {
        let nano = identity("Nano", 0);
        assert!(resolves(&TargetSelector::ByName("Nano".into()), &nano));
        assert!(!resolves(&TargetSelector::ByName("ESP66".into()), &nano));
        // Case-sensitive, exact.
        assert!(!resolves(&TargetSelector::ByName("nano".into()), &nano));
        assert!(!resolves(&TargetSelector::ByName("Nan".into()), &nano));
    }

    #[test]
    fn channel_resolves_only_the_current_channel() {
        let nano = identity("Nano", 11);
        assert!(resolves(&TargetSelector::ByChannel(11), &nano));
        assert!(!resolves(&TargetSelector::ByChannel(0), &nano));
    }

    #[test]
    fn wildcard_resolves_everyone() {
        assert!(resolves(&TargetSelector::All, &identity("Nano", 0)));
        assert!(resolves(&TargetSelector::All, &identity("ESP66", 999)));
    }
}
