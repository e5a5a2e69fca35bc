//! Domain layer for shadersync.
//!
//! Holds the runtime readiness state machine, the typed bridge over the
//! runtime's string interface, the session model and its persisted form, and
//! the traits every external collaborator implements.

pub mod bridge;
pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod loader;
pub mod runtime;
pub mod session;
pub mod store;

// Re-export common error type
pub use error::{Result, SyncError};
