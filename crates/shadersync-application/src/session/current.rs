use shadersync_core::session::{AssetMap, AssetSource, Session, Slot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Proof that work was started on behalf of a particular session.
///
/// Tickets are compared against the live generation before every mutation
/// of runtime or session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket {
    generation: u64,
}

impl SessionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The one live session plus the slot currently shown in the editor.
pub struct CurrentSession {
    session: Mutex<Session>,
    active: Mutex<Slot>,
    generation: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CurrentSession {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
            active: Mutex::new(Slot::Fragment),
            generation: AtomicU64::new(0),
        }
    }

    /// Ticket for the session as it is now.
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Claims `identity` for a new load.
    ///
    /// # Returns
    ///
    /// `None` if `identity` is already the current (or currently loading)
    /// identity. Otherwise the identity is recorded, every outstanding
    /// ticket is superseded and a fresh ticket is returned.
    pub fn claim(&self, identity: &str) -> Option<SessionTicket> {
        let mut session = lock(&self.session);
        if session.identity.as_deref() == Some(identity) {
            return None;
        }
        session.identity = Some(identity.to_string());
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Some(SessionTicket { generation })
    }

    /// Forgets the identity claimed by `ticket` so the same load can be
    /// retried. Does nothing if a newer load has taken over.
    pub fn release(&self, ticket: &SessionTicket) {
        let mut session = lock(&self.session);
        if self.is_current(ticket) {
            session.identity = None;
        }
    }

    /// Records the identity of a document this session was just stored as.
    pub fn adopt_identity(&self, identity: impl Into<String>) {
        lock(&self.session).identity = Some(identity.into());
    }

    pub fn identity(&self) -> Option<String> {
        lock(&self.session).identity.clone()
    }

    pub fn snapshot(&self) -> Session {
        lock(&self.session).clone()
    }

    /// Runs `f` against the session under its lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut lock(&self.session))
    }

    pub fn source(&self, slot: Slot) -> String {
        lock(&self.session).source(slot).to_string()
    }

    pub fn set_source(&self, slot: Slot, text: impl Into<String>) {
        lock(&self.session).set_source(slot, text);
    }

    pub fn put_asset(&self, name: impl Into<String>, source: AssetSource) {
        lock(&self.session).put_asset(name, source);
    }

    pub fn assets(&self) -> AssetMap {
        lock(&self.session).assets.clone()
    }

    pub fn has_default_sources(&self) -> bool {
        lock(&self.session).has_default_sources()
    }

    pub fn active_slot(&self) -> Slot {
        *lock(&self.active)
    }

    pub fn set_active_slot(&self, slot: Slot) {
        *lock(&self.active) = slot;
    }
}

impl Default for CurrentSession {
    fn default() -> Self {
        Self::new(Session::with_defaults())
    }
}
