use super::boundary::RuntimeBoundary;
use crate::error::{Result, SyncError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shortest period a poll may run at. Timers reject a zero period.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

/// Lifecycle of the sandboxed runtime as observed from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeState {
    /// Nothing observed yet
    Uninitialized,
    /// One of the two readiness flags has been seen
    Booting,
    /// Script instantiated and file system attachable
    Ready,
    /// Context lost; a full reload is required
    Lost { cause: String },
}

impl RuntimeState {
    fn rank(&self) -> u8 {
        match self {
            RuntimeState::Uninitialized => 0,
            RuntimeState::Booting => 1,
            RuntimeState::Ready => 2,
            RuntimeState::Lost { .. } => 3,
        }
    }
}

/// Owns the readiness state of the runtime.
///
/// `RuntimeHandle` is responsible for:
/// - Polling the two raw readiness flags until both hold
/// - Caching the result so `is_ready` is a plain read
/// - Latching context loss (terminal)
/// - Gating every call into the runtime
///
/// State only moves forward: Uninitialized → Booting → Ready, and any state
/// → Lost.
pub struct RuntimeHandle {
    boundary: Arc<dyn RuntimeBoundary>,
    state: watch::Sender<RuntimeState>,
}

impl RuntimeHandle {
    pub fn new(boundary: Arc<dyn RuntimeBoundary>) -> Self {
        let (state, _) = watch::channel(RuntimeState::Uninitialized);
        Self { boundary, state }
    }

    pub fn state(&self) -> RuntimeState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), RuntimeState::Ready)
    }

    pub fn is_lost(&self) -> bool {
        matches!(*self.state.borrow(), RuntimeState::Lost { .. })
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<RuntimeState> {
        self.state.subscribe()
    }

    /// Polls the raw flags once and advances the state if they allow it.
    ///
    /// # Returns
    ///
    /// `true` once the runtime is Ready.
    pub fn observe_readiness(&self) -> bool {
        let script_ready = self.boundary.is_script_ready();
        let fs_ready = self.boundary.is_fs_ready();

        let observed = if script_ready && fs_ready {
            RuntimeState::Ready
        } else if script_ready || fs_ready {
            RuntimeState::Booting
        } else {
            RuntimeState::Uninitialized
        };

        let advanced = self.state.send_if_modified(|state| {
            if observed.rank() > state.rank() {
                *state = observed.clone();
                true
            } else {
                false
            }
        });

        if advanced {
            tracing::info!("[Runtime] State advanced to {:?}", observed);
        }

        self.is_ready()
    }

    /// Latches runtime loss. Terminal; later calls keep the first cause.
    pub fn on_loss(&self, cause: impl Into<String>) {
        let cause = cause.into();
        let latched = self.state.send_if_modified(|state| {
            if matches!(state, RuntimeState::Lost { .. }) {
                return false;
            }
            *state = RuntimeState::Lost {
                cause: cause.clone(),
            };
            true
        });

        if latched {
            tracing::error!("[Runtime] Lost: {}", cause);
        }
    }

    /// Starts the fixed-period readiness poll.
    ///
    /// The task stops by itself once the runtime is Ready or Lost. A zero
    /// `period` is raised to [`MIN_POLL_PERIOD`].
    pub fn start_readiness_poll(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let handle = Arc::clone(self);
        let period = period.max(MIN_POLL_PERIOD);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::debug!("[Runtime] Readiness poll started ({:?} period)", period);

            loop {
                ticker.tick().await;
                if handle.is_lost() || handle.observe_readiness() {
                    break;
                }
            }

            tracing::debug!("[Runtime] Readiness poll stopped");
        })
    }

    /// Waits until the runtime is Ready.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeLost` if the runtime is lost first.
    pub async fn wait_ready(&self) -> Result<()> {
        let mut receiver = self.state.subscribe();
        let state = receiver
            .wait_for(|state| {
                matches!(state, RuntimeState::Ready | RuntimeState::Lost { .. })
            })
            .await
            .map_err(|_| SyncError::RuntimeLost("runtime handle dropped".to_string()))?
            .clone();

        match state {
            RuntimeState::Lost { cause } => Err(SyncError::RuntimeLost(cause)),
            _ => Ok(()),
        }
    }

    /// The call gate: yields the boundary only while Ready.
    ///
    /// # Errors
    ///
    /// - `NotReady` before the runtime is Ready
    /// - `RuntimeLost` after loss
    pub fn gate(&self) -> Result<&dyn RuntimeBoundary> {
        match &*self.state.borrow() {
            RuntimeState::Ready => Ok(self.boundary.as_ref()),
            RuntimeState::Lost { cause } => Err(SyncError::RuntimeLost(cause.clone())),
            _ => Err(SyncError::NotReady),
        }
    }

    /// Whether the virtual file system can take writes right now.
    pub fn fs_attachable(&self) -> bool {
        !self.is_lost() && self.boundary.is_fs_ready()
    }
}
