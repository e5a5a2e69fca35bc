use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One of the two editable source slots.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum Slot {
    #[serde(rename = "frag")]
    #[strum(serialize = "frag")]
    Fragment,
    #[serde(rename = "vert")]
    #[strum(serialize = "vert")]
    Vertex,
}

impl Slot {
    /// Slot a dropped text file belongs to, by extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "frag" | "fs" => Some(Slot::Fragment),
            "vert" | "vs" => Some(Slot::Vertex),
            _ => None,
        }
    }
}

/// A value per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPair<T> {
    pub fragment: T,
    pub vertex: T,
}

impl<T> SlotPair<T> {
    pub fn new(fragment: T, vertex: T) -> Self {
        Self { fragment, vertex }
    }

    pub fn get(&self, slot: Slot) -> &T {
        match slot {
            Slot::Fragment => &self.fragment,
            Slot::Vertex => &self.vertex,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut T {
        match slot {
            Slot::Fragment => &mut self.fragment,
            Slot::Vertex => &mut self.vertex,
        }
    }

    pub fn set(&mut self, slot: Slot, value: T) {
        *self.get_mut(slot) = value;
    }
}
