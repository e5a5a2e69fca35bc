use super::request::{Command, FullscreenAction, RuntimeRequest};
use crate::console::Console;
use crate::error::Result;
use crate::runtime::{FullscreenControl, RuntimeHandle};
use crate::session::{CommandHistory, Slot, SlotPair};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Typed request/response surface over the runtime's string interface.
///
/// Every call goes through the runtime's readiness gate. While the runtime
/// is not ready, commands and sources are dropped and queries answer `None`.
/// Runtime failures are reported to the console and never propagated, with
/// the exception of [`CommandBridge::notify_asset_loaded`], whose caller
/// needs the outcome.
pub struct CommandBridge {
    runtime: Arc<RuntimeHandle>,
    fullscreen: Arc<dyn FullscreenControl>,
    console: Console,
    history: Mutex<CommandHistory>,
    /// Last source text the runtime accepted, per slot
    delivered: Mutex<SlotPair<Option<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CommandBridge {
    pub fn new(
        runtime: Arc<RuntimeHandle>,
        fullscreen: Arc<dyn FullscreenControl>,
        console: Console,
    ) -> Self {
        Self {
            runtime,
            fullscreen,
            console,
            history: Mutex::new(CommandHistory::new()),
            delivered: Mutex::new(SlotPair::default()),
        }
    }

    pub fn runtime(&self) -> &Arc<RuntimeHandle> {
        &self.runtime
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Sends console text as a command.
    ///
    /// Fullscreen forms are answered locally with `on`/`off`.
    pub fn send_command(&self, text: &str) -> Option<String> {
        self.send(&Command::parse(text))
    }

    pub fn send(&self, command: &Command) -> Option<String> {
        let text = command.to_string();
        self.console.log(format!("> {}", text));

        if let Some(action) = FullscreenAction::from_command(command) {
            return Some(self.apply_fullscreen(action));
        }

        lock(&self.history).record(&text);

        self.dispatch(RuntimeRequest::Command(command)).ok().flatten()
    }

    /// Queries a runtime value by name. `fullscreen` is answered locally.
    pub fn query(&self, name: &str) -> Option<String> {
        if name == "fullscreen" {
            return Some(on_off(self.fullscreen.is_fullscreen()).to_string());
        }
        self.dispatch(RuntimeRequest::Query(name)).ok().flatten()
    }

    /// Pushes a source to the runtime.
    ///
    /// # Returns
    ///
    /// `true` if the runtime accepted it.
    pub fn set_source(&self, slot: Slot, text: &str) -> bool {
        match self.dispatch(RuntimeRequest::SetSource { slot, text }) {
            Ok(_) => {
                lock(&self.delivered).set(slot, Some(text.to_string()));
                true
            }
            Err(_) => false,
        }
    }

    /// Asks the runtime for the source of its default scene.
    pub fn default_source(&self, slot: Slot) -> Option<String> {
        self.dispatch(RuntimeRequest::DefaultSource(slot))
            .ok()
            .flatten()
            .filter(|source| !source.is_empty())
    }

    /// Tells the runtime a file landed in its virtual file system.
    ///
    /// # Errors
    ///
    /// Propagates gate and runtime failures (after logging them).
    pub fn notify_asset_loaded(&self, name: &str, extension: &str) -> Result<()> {
        self.dispatch(RuntimeRequest::AssetLoaded { name, extension })
            .map(|_| ())
    }

    /// Last source text the runtime accepted for `slot`.
    pub fn last_delivered(&self, slot: Slot) -> Option<String> {
        lock(&self.delivered).get(slot).clone()
    }

    /// Listenable commands sent so far.
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).entries().to_vec()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn set_fullscreen(&self, on: bool) {
        self.fullscreen.set_fullscreen(on);
    }

    fn apply_fullscreen(&self, action: FullscreenAction) -> String {
        match action {
            FullscreenAction::Query => {
                let state = on_off(self.fullscreen.is_fullscreen());
                self.console.log(state);
                return state.to_string();
            }
            FullscreenAction::On => self.fullscreen.set_fullscreen(true),
            FullscreenAction::Off => self.fullscreen.set_fullscreen(false),
            FullscreenAction::Toggle => self
                .fullscreen
                .set_fullscreen(!self.fullscreen.is_fullscreen()),
        }
        on_off(self.fullscreen.is_fullscreen()).to_string()
    }

    fn dispatch(&self, request: RuntimeRequest<'_>) -> Result<Option<String>> {
        let boundary = self.runtime.gate().inspect_err(|e| {
            tracing::debug!("[Bridge] Dropped while {}: {}", request, e);
        })?;

        request.invoke(boundary).inspect_err(|e| {
            tracing::warn!("[Bridge] Failed while {}: {}", request, e);
            self.console.error(format!("Error {}: {}", request, e));
        })
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
