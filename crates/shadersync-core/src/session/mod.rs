//! Session domain module.
//!
//! This module contains the editable session model and its persisted form.
//!
//! # Module Structure
//!
//! - `slot`: The two editable source slots (`Slot`, `SlotPair`)
//! - `asset`: Asset sources and the keyed asset map (`AssetSource`, `DataUrl`, `AssetMap`)
//! - `history`: Append-only log of listenable commands (`CommandHistory`)
//! - `retained`: Retained runtime state sweep (`retained_state`)
//! - `document`: Persisted JSON shape (`Document`)
//! - `defaults`: Built-in starter sources
//! - `identity`: Document identity parsing
//! - `model`: The session itself (`Session`)

mod asset;
mod defaults;
mod document;
mod history;
mod identity;
mod model;
mod retained;
mod slot;

pub use asset::{AssetMap, AssetSource, DataUrl, asset_extension};
pub use defaults::{DEFAULT_FRAGMENT, DEFAULT_VERTEX, default_source};
pub use document::Document;
pub use history::{CommandHistory, LISTENED_COMMANDS};
pub use identity::parse_identity;
pub use model::Session;
pub use retained::{CAMERA_COMMANDS, PLOT_MODES, STATE_COMMANDS, retained_state};
pub use slot::{Slot, SlotPair};
