//! Command/query bridge.
//!
//! # Module Structure
//!
//! - `request`: Typed requests and the single translation point to runtime calls
//! - `command_bridge`: `CommandBridge`, the guarded request/response surface

mod command_bridge;
mod request;

pub use command_bridge::CommandBridge;
pub use request::{Command, FullscreenAction, RuntimeRequest};
