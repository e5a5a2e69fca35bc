//! Debounced delivery of editor text to the runtime.

use crate::session::CurrentSession;
use shadersync_core::bridge::CommandBridge;
use shadersync_core::editor::EditorView;
use shadersync_core::session::Slot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// The timer of the edit waiting for its quiet window to elapse.
///
/// Carries no text: the editor is read when the flush happens, so anything
/// that replaced the editor content in the meantime (a load, a drop) wins.
struct PendingEdit {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct ChannelState {
    generation: u64,
    pending: Option<PendingEdit>,
}

/// Coalesces editor changes into source pushes.
///
/// There is one timer for the whole editor, not one per slot: only the
/// active slot is ever editable. Within a quiet window only the last edit is
/// pushed, and nothing is pushed if the text matches what the runtime last
/// accepted.
pub struct EditChannel {
    bridge: Arc<CommandBridge>,
    editor: Arc<dyn EditorView>,
    session: Arc<CurrentSession>,
    debounce: Duration,
    state: Mutex<ChannelState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EditChannel {
    pub fn new(
        bridge: Arc<CommandBridge>,
        editor: Arc<dyn EditorView>,
        session: Arc<CurrentSession>,
        debounce: Duration,
    ) -> Self {
        Self {
            bridge,
            editor,
            session,
            debounce,
            state: Mutex::new(ChannelState::default()),
        }
    }

    /// Handles an editor change event.
    ///
    /// Cancels the previous timer, clears error markers and schedules a
    /// flush after the quiet window.
    pub fn on_edit(self: &Arc<Self>) {
        self.editor.clear_error_lines();

        let mut state = lock(&self.state);
        if let Some(timer) = state.pending.take().and_then(|pending| pending.timer) {
            timer.abort();
        }
        state.generation += 1;
        let generation = state.generation;

        let channel = Arc::clone(self);
        let debounce = self.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            channel.flush_scheduled(generation);
        });

        state.pending = Some(PendingEdit {
            generation,
            timer: Some(timer),
        });
    }

    /// Flushes immediately, cancelling any scheduled flush.
    pub fn flush_now(&self) {
        if let Some(timer) = lock(&self.state).pending.take().and_then(|pending| pending.timer) {
            timer.abort();
        }
        self.deliver(self.editor.value());
    }

    /// Whether a flush is scheduled.
    pub fn has_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    /// Makes `slot` the active slot.
    ///
    /// The outgoing slot is flushed first, so no edit is lost by switching.
    pub fn switch_slot(&self, slot: Slot) {
        if self.session.active_slot() == slot {
            return;
        }

        // Editing wins over viewing
        if self.bridge.is_fullscreen() {
            self.bridge.set_fullscreen(false);
        }

        self.flush_now();
        self.session.set_active_slot(slot);
        tracing::debug!("[EditChannel] Switched to {} slot", slot);
        self.editor.set_value(&self.session.source(slot));
    }

    /// Leaves fullscreen so the user can edit, flushing first.
    pub fn leave_fullscreen_for_editing(&self) {
        if !self.bridge.is_fullscreen() {
            return;
        }
        self.bridge.set_fullscreen(false);
        self.flush_now();
    }

    fn flush_scheduled(&self, generation: u64) {
        let pending = {
            let mut state = lock(&self.state);
            match &state.pending {
                Some(pending) if pending.generation == generation => state.pending.take(),
                _ => None,
            }
        };

        if pending.is_some() {
            self.deliver(self.editor.value());
        }
    }

    /// Stores `text` as the active slot's source and pushes it if the runtime
    /// has not already accepted it.
    fn deliver(&self, text: String) {
        let slot = self.session.active_slot();
        self.session.set_source(slot, text.as_str());

        if self.bridge.last_delivered(slot).as_deref() == Some(text.as_str()) {
            tracing::trace!("[EditChannel] {} unchanged, skipping push", slot);
            return;
        }

        if self.bridge.set_source(slot, &text) {
            tracing::debug!("[EditChannel] Pushed {} source ({} bytes)", slot, text.len());
        }
    }
}
