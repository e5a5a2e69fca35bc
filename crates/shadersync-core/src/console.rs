//! User-visible console sink.
//!
//! Every warning the engine degrades to ends up here, next to the runtime's
//! own stdout/stderr. Lines are forwarded over an unbounded channel so the
//! host can render them without the engine knowing how.

use serde::Serialize;
use tokio::sync::mpsc;

/// A single console line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleLine {
    /// Human-readable text
    pub text: String,
    /// Rendered in the error color when set
    pub is_error: bool,
    /// Timestamp (RFC 3339)
    pub timestamp: String,
}

/// Events delivered to the console host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleEvent {
    Line(ConsoleLine),
    Clear,
}

/// Cloneable handle that writes to the console channel.
#[derive(Clone, Debug)]
pub struct Console {
    sender: mpsc::UnboundedSender<ConsoleEvent>,
}

impl Console {
    /// Creates a console and the receiver the host drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConsoleEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Creates a console whose output is discarded.
    pub fn detached() -> Self {
        Self::channel().0
    }

    pub fn log(&self, text: impl Into<String>) {
        self.push(text.into(), false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(text.into(), true);
    }

    pub fn clear(&self) {
        // Non-blocking send - if the host is gone we just skip
        let _ = self.sender.send(ConsoleEvent::Clear);
    }

    fn push(&self, text: String, is_error: bool) {
        if is_error {
            tracing::warn!(target: "console", "{}", text);
        } else {
            tracing::debug!(target: "console", "{}", text);
        }

        let _ = self.sender.send(ConsoleEvent::Line(ConsoleLine {
            text,
            is_error,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }));
    }
}

/// Drains everything currently buffered in a console receiver.
///
/// Handy for hosts that render on a frame tick, and for tests.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<ConsoleEvent>) -> Vec<ConsoleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
