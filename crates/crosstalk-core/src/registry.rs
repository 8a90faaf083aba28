// ── Capability registry ──
//
// Lookup-by-name stays, runtime type inspection goes: capabilities are a
// fixed name→closure table built once at startup, alongside the manifesto
// that advertises them. The builder is the only way to construct either,
// which keeps the two in lockstep by construction.

use std::collections::BTreeMap;

use crate::model::Manifesto;

/// A `run` action. Fire-and-acknowledge: the agent replies `ROGER` no
/// matter what the action does, so there is nothing to return.
pub type RunHandler = Box<dyn FnMut() + Send>;

/// A `set` handler. May refuse the value; the reason travels back to the
/// sender as a structured error result.
pub type SetHandler = Box<dyn FnMut(&str) -> Result<(), String> + Send>;

/// A `get` handler producing the current value as text.
pub type GetHandler = Box<dyn FnMut() -> String + Send>;

/// The handler table behind a device's manifesto.
pub struct CapabilityRegistry {
    run: BTreeMap<String, RunHandler>,
    set: BTreeMap<String, SetHandler>,
    get: BTreeMap<String, GetHandler>,
}

impl CapabilityRegistry {
    pub(crate) fn run(&mut self, name: &str) -> Option<&mut RunHandler> {
        self.run.get_mut(name)
    }

    pub(crate) fn set(&mut self, name: &str) -> Option<&mut SetHandler> {
        self.set.get_mut(name)
    }

    pub(crate) fn get(&mut self, name: &str) -> Option<&mut GetHandler> {
        self.get.get_mut(name)
    }
}

/// A manifesto and its handler table, built together.
pub struct Capabilities {
    pub(crate) manifesto: Manifesto,
    pub(crate) registry: CapabilityRegistry,
}

impl Capabilities {
    pub fn builder(
        description: impl Into<String>,
        platform: impl Into<String>,
    ) -> CapabilitiesBuilder {
        CapabilitiesBuilder {
            description: description.into(),
            platform: platform.into(),
            run: BTreeMap::new(),
            set: BTreeMap::new(),
            get: BTreeMap::new(),
        }
    }

    pub fn manifesto(&self) -> &Manifesto {
        &self.manifesto
    }
}

pub struct CapabilitiesBuilder {
    description: String,
    platform: String,
    run: BTreeMap<String, (String, RunHandler)>,
    set: BTreeMap<String, (String, SetHandler)>,
    get: BTreeMap<String, (String, GetHandler)>,
}

impl CapabilitiesBuilder {
    /// Register a `run` action. A duplicate name replaces the earlier one.
    pub fn run(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl FnMut() + Send + 'static,
    ) -> Self {
        self.run
            .insert(name.into(), (description.into(), Box::new(handler)));
        self
    }

    /// Register a `set` handler.
    pub fn set(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl FnMut(&str) -> Result<(), String> + Send + 'static,
    ) -> Self {
        self.set
            .insert(name.into(), (description.into(), Box::new(handler)));
        self
    }

    /// Register a `get` handler.
    pub fn get(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl FnMut() -> String + Send + 'static,
    ) -> Self {
        self.get
            .insert(name.into(), (description.into(), Box::new(handler)));
        self
    }

    pub fn build(self) -> Capabilities {
        fn split<H>(map: BTreeMap<String, (String, H)>) -> (BTreeMap<String, String>, BTreeMap<String, H>) {
            let mut descriptions = BTreeMap::new();
            let mut handlers = BTreeMap::new();
            for (name, (description, handler)) in map {
                descriptions.insert(name.clone(), description);
                handlers.insert(name, handler);
            }
            (descriptions, handlers)
        }

        let (run_desc, run) = split(self.run);
        let (set_desc, set) = split(self.set);
        let (get_desc, get) = split(self.get);

        Capabilities {
            manifesto: Manifesto::new(self.description, self.platform, run_desc, get_desc, set_desc),
            registry: CapabilityRegistry { run, set, get },
        }
    }
}
