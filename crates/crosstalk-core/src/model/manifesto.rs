// ── Manifesto: a device's immutable self-description ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which capability map an entry belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CapabilityKind {
    Run,
    Get,
    Set,
}

/// One displayable capability: `(kind, name, description)`.
///
/// This is the element type of the `list` reply on the wire, so it
/// carries serde derives even though the rest of the manifesto does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestoEntry {
    pub kind: CapabilityKind,
    pub name: String,
    pub description: String,
}

/// A device's self-description: identity metadata plus the names and
/// descriptions of its invocable capabilities.
///
/// Capabilities are fixed per firmware build, so the manifesto is
/// constructed once at startup (through [`crate::registry::Capabilities`],
/// which keeps these maps in lockstep with the handler table) and never
/// mutated. Channel and port are mutable config carried alongside it,
/// not part of the capability set.
#[derive(Debug, Clone)]
pub struct Manifesto {
    description: String,
    platform: String,
    run: BTreeMap<String, String>,
    get: BTreeMap<String, String>,
    set: BTreeMap<String, String>,
}

impl Manifesto {
    pub(crate) fn new(
        description: String,
        platform: String,
        run: BTreeMap<String, String>,
        get: BTreeMap<String, String>,
        set: BTreeMap<String, String>,
    ) -> Self {
        Self {
            description,
            platform,
            run,
            get,
            set,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// All capabilities as display tuples: run, then get, then set, names
    /// sorted within each kind (the maps are ordered).
    pub fn entries(&self) -> Vec<ManifestoEntry> {
        let kinds = [
            (CapabilityKind::Run, &self.run),
            (CapabilityKind::Get, &self.get),
            (CapabilityKind::Set, &self.set),
        ];
        kinds
            .into_iter()
            .flat_map(|(kind, map)| {
                map.iter().map(move |(name, description)| ManifestoEntry {
                    kind,
                    name: name.clone(),
                    description: description.clone(),
                })
            })
            .collect()
    }
}
