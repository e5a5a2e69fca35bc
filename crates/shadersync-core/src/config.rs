//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the synchronization engine.
///
/// Every field has a default, so a partial `config.toml` is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Period of the readiness poll and of the asset-write retry
    pub poll_interval_ms: u64,
    /// Quiet window before an edit is pushed
    pub debounce_ms: u64,
    /// Attempts an asset waits for the runtime before failing
    pub max_attempts: u32,
    /// Base URL of the document store API
    pub store_url: String,
    /// Well-known file name of the shader definition inside a document
    pub document_name: String,
    /// Prefix of the description given to published documents
    pub description_prefix: String,
    /// Whether published documents are public
    pub public_documents: bool,
    /// Timeout for store and asset requests
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            debounce_ms: 300,
            max_attempts: 20,
            store_url: "https://api.github.com".to_string(),
            document_name: "shader.json".to_string(),
            description_prefix: "glslViewer Shader: ".to_string(),
            public_documents: true,
            request_timeout_secs: 30,
        }
    }
}

impl SyncConfig {
    /// Poll period; `0` is read as the shortest period a timer accepts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Credentials, kept apart from the tunables.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}
