//! Current-session bookkeeping.
//!
//! Exactly one session is current at a time. Loads supersede it; work that
//! belongs to a superseded session finishes but must not touch shared state.

mod current;

pub use current::{CurrentSession, SessionTicket};
