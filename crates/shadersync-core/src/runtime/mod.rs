//! Runtime domain module.
//!
//! # Module Structure
//!
//! - `boundary`: Traits implemented by the host around the sandboxed runtime
//! - `handle`: Readiness/loss state machine (`RuntimeHandle`)

mod boundary;
mod handle;

pub use boundary::{FullscreenControl, RuntimeBoundary};
pub use handle::{MIN_POLL_PERIOD, RuntimeHandle, RuntimeState};
