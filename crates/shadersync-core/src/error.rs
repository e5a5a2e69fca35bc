//! Error types for shadersync.

use thiserror::Error;

/// A shared error type for the synchronization engine.
///
/// Nothing in the engine is fatal to the process. Each variant names the
/// boundary it came from so callers can decide whether to degrade to a
/// console warning or abort the unit of work it belongs to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A runtime call was attempted before the runtime reported readiness
    #[error("Runtime is not ready")]
    NotReady,

    /// The runtime lost its context and will not come back
    #[error("Runtime lost: {0}")]
    RuntimeLost(String),

    /// Network failure while fetching an asset or a document
    #[error("Transport error: {context} - {message}")]
    Transport { context: String, message: String },

    /// Malformed inline data or malformed document JSON
    #[error("Decode error: {what} - {message}")]
    Decode { what: String, message: String },

    /// The runtime rejected or threw on a call
    #[error("Runtime call failed: {0}")]
    RuntimeCall(String),

    /// Waiting for the runtime exceeded the attempt budget
    #[error("Gave up waiting for the runtime after {attempts} attempts")]
    TimeoutExhausted { attempts: u32 },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Missing or rejected credentials for the document store
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },
}

impl SyncError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates a Decode error
    pub fn decode(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Creates a RuntimeCall error
    pub fn runtime_call(message: impl Into<String>) -> Self {
        Self::RuntimeCall(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotReady error
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }

    /// Check if the runtime is gone for good
    pub fn is_runtime_lost(&self) -> bool {
        matches!(self, Self::RuntimeLost(_))
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for SyncError {
    fn from(err: base64::DecodeError) -> Self {
        Self::decode("base64", err.to_string())
    }
}

/// A type alias for `Result<T, SyncError>`.
pub type Result<T> = std::result::Result<T, SyncError>;
