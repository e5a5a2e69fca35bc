use shadersync_core::SyncError;
use shadersync_core::config::SyncConfig;
use shadersync_core::runtime::MIN_POLL_PERIOD;
use shadersync_core::session::{AssetSource, asset_extension};
use std::fmt;
use std::time::Duration;

/// Extensions that replace the runtime's scene when loaded.
pub const SCENE_EXTENSIONS: &[&str] = &["ply", "obj", "gltf", "glb", "splat"];

/// Extensions loaded as an environment map.
pub const ENVIRONMENT_EXTENSIONS: &[&str] = &["hdr"];

/// How long a job waits for the runtime before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between readiness checks
    pub period: Duration,
    /// Readiness checks before the job fails
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(period: Duration, max_attempts: u32) -> Self {
        Self {
            period: period.max(MIN_POLL_PERIOD),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.poll_interval(), config.max_attempts)
    }

    /// Upper bound on the time a job spends waiting.
    pub fn budget(&self) -> Duration {
        self.period * self.max_attempts.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 20)
    }
}

/// Why a job ended without being applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    /// Remote fetch failed or returned a non-success status
    Transport(String),
    /// Inline data could not be decoded
    Decode(String),
    /// The runtime never became ready within the attempt budget
    TimeoutExhausted { attempts: u32 },
    /// The runtime was lost while the job waited or wrote
    RuntimeLost(String),
    /// Writing the file or notifying the runtime failed
    Write(String),
    /// A newer session took over before the job touched the runtime
    Superseded,
}

impl JobFailure {
    /// Classifies a failure raised while writing or notifying.
    pub fn from_write_error(error: SyncError) -> Self {
        match error {
            SyncError::RuntimeLost(cause) => JobFailure::RuntimeLost(cause),
            other => JobFailure::Write(other.to_string()),
        }
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobFailure::Transport(message) => write!(f, "transport failure: {}", message),
            JobFailure::Decode(message) => write!(f, "decode failure: {}", message),
            JobFailure::TimeoutExhausted { attempts } => {
                write!(f, "runtime not ready after {} attempts", attempts)
            }
            JobFailure::RuntimeLost(cause) => write!(f, "runtime lost: {}", cause),
            JobFailure::Write(message) => write!(f, "write failure: {}", message),
            JobFailure::Superseded => write!(f, "superseded by a newer session"),
        }
    }
}

/// Lifecycle of a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Fetching,
    Decoded,
    AwaitingRuntime,
    Applied,
    Failed(JobFailure),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Applied | JobState::Failed(_))
    }
}

/// Follow-up issued after an asset lands in the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Re-query the default scene sources and push them
    RestoreDefaultScene,
    /// Turn the environment map on
    EnableCubemap,
}

impl FollowUp {
    pub fn for_extension(extension: &str) -> Option<Self> {
        if SCENE_EXTENSIONS.contains(&extension) {
            Some(FollowUp::RestoreDefaultScene)
        } else if ENVIRONMENT_EXTENSIONS.contains(&extension) {
            Some(FollowUp::EnableCubemap)
        } else {
            None
        }
    }
}

/// One asset on its way into the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionJob {
    name: String,
    extension: String,
    source: AssetSource,
    state: JobState,
    attempts: u32,
}

impl IngestionJob {
    pub fn new(name: impl Into<String>, source: AssetSource) -> Self {
        let name = name.into();
        Self {
            extension: asset_extension(&name),
            name,
            source,
            state: JobState::Pending,
            attempts: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the bytes are written to in the virtual file system.
    pub fn target_path(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Readiness checks spent waiting for the runtime.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_applied(&self) -> bool {
        self.state == JobState::Applied
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        match &self.state {
            JobState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn follow_up(&self) -> Option<FollowUp> {
        FollowUp::for_extension(&self.extension)
    }

    pub(crate) fn advance(&mut self, state: JobState) {
        tracing::trace!("[Ingestion] {} {:?} -> {:?}", self.name, self.state, state);
        self.state = state;
    }

    pub(crate) fn fail(&mut self, failure: JobFailure) {
        self.advance(JobState::Failed(failure));
    }

    pub(crate) fn count_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }
}
