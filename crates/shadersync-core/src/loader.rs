//! Loader reference counter.
//!
//! Long operations (pipeline runs, document fetches, dropped files) overlap
//! freely. The counter aggregates them into a single busy/idle signal that
//! flips only on the 0 → 1 and 1 → 0 transitions.

use std::sync::Arc;
use tokio::sync::watch;

const DEFAULT_MESSAGE: &str = "Loading...";

/// Snapshot of the loader published to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderState {
    /// Number of outstanding operations
    pub pending: usize,
    /// Text shown next to the spinner
    pub message: String,
}

impl LoaderState {
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }
}

impl Default for LoaderState {
    fn default() -> Self {
        Self {
            pending: 0,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Shared busy-state aggregator. Cloning shares the same counter.
#[derive(Clone, Debug)]
pub struct LoaderCounter {
    state: Arc<watch::Sender<LoaderState>>,
}

impl LoaderCounter {
    pub fn new() -> Self {
        let (state, _) = watch::channel(LoaderState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Registers one more outstanding operation.
    pub fn show(&self, message: Option<&str>) {
        self.state.send_if_modified(|state| {
            state.pending += 1;
            let mut changed = state.pending == 1;
            if let Some(message) = message
                && state.message != message
            {
                state.message = message.to_string();
                changed = true;
            }
            changed
        });
    }

    /// Settles one outstanding operation. Extra calls clamp at zero.
    pub fn hide(&self) {
        self.state.send_if_modified(|state| {
            if state.pending == 0 {
                return false;
            }
            state.pending -= 1;
            if state.pending == 0 {
                state.message = DEFAULT_MESSAGE.to_string();
                true
            } else {
                false
            }
        });
    }

    /// Replaces the spinner text without touching the count.
    pub fn update(&self, message: &str) {
        self.state.send_if_modified(|state| {
            if state.message == message {
                return false;
            }
            state.message = message.to_string();
            true
        });
    }

    /// Shows the loader until the returned guard is dropped.
    pub fn guard(&self, message: Option<&str>) -> LoaderGuard {
        self.show(message);
        LoaderGuard {
            loader: self.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.state.subscribe()
    }
}

impl Default for LoaderCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the loader on drop.
#[derive(Debug)]
pub struct LoaderGuard {
    loader: LoaderCounter,
}

impl Drop for LoaderGuard {
    fn drop(&mut self) {
        self.loader.hide();
    }
}
