use super::asset::{AssetMap, AssetSource};
use super::defaults::default_source;
use super::slot::{Slot, SlotPair};

/// The full editable state the user is working on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// External document id this session was loaded from, if any
    pub identity: Option<String>,
    /// Current source text per slot
    pub sources: SlotPair<String>,
    /// Assets by name
    pub assets: AssetMap,
}

impl Session {
    /// A fresh session holding the built-in starter sources.
    pub fn with_defaults() -> Self {
        Self {
            identity: None,
            sources: SlotPair::new(
                default_source(Slot::Fragment).to_string(),
                default_source(Slot::Vertex).to_string(),
            ),
            assets: AssetMap::new(),
        }
    }

    pub fn source(&self, slot: Slot) -> &str {
        self.sources.get(slot)
    }

    pub fn set_source(&mut self, slot: Slot, text: impl Into<String>) {
        self.sources.set(slot, text.into());
    }

    /// Insert-or-replace an asset by name.
    pub fn put_asset(&mut self, name: impl Into<String>, source: AssetSource) {
        self.assets.insert(name, source);
    }

    /// Whether both slots still hold the built-in starter sources.
    pub fn has_default_sources(&self) -> bool {
        self.source(Slot::Fragment) == default_source(Slot::Fragment)
            && self.source(Slot::Vertex) == default_source(Slot::Vertex)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::with_defaults()
    }
}
