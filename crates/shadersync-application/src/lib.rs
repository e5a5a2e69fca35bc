//! Application layer for shadersync.
//!
//! This crate provides the services that coordinate the runtime bridge, the
//! session and the external collaborators: asset ingestion, debounced edit
//! delivery, session persistence, file drops, diagnostics and view toggles.

pub mod diagnostics;
pub mod drop_handler;
pub mod edit_channel;
pub mod ingestion;
pub mod serializer;
pub mod session;
pub mod view_toggles;
pub mod workbench;

pub use diagnostics::Diagnostics;
pub use drop_handler::{DropHandler, DropOutcome};
pub use edit_channel::EditChannel;
pub use ingestion::{AssetIngestionPipeline, IngestionReport, RetryPolicy};
pub use serializer::{LoadOutcome, SessionSerializer};
pub use session::{CurrentSession, SessionTicket};
pub use view_toggles::ViewToggles;
pub use workbench::{Collaborators, Workbench};
