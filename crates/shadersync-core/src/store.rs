//! Document store and asset fetcher boundaries.
//!
//! This module provides the traits the engine uses to reach the network,
//! allowing different implementations (a gist-backed store, in-memory
//! stores for tests, etc.).

use crate::error::{Result, SyncError};
use async_trait::async_trait;

/// One file inside a stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredFile {
    /// File name within the document
    pub name: String,
    /// Inline content, possibly cut short
    pub content: Option<String>,
    /// Whether `content` was truncated by the store
    pub truncated: bool,
    /// URL of the full raw body
    pub raw_url: Option<String>,
}

/// A stored document as returned by the store, files in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredDocument {
    pub files: Vec<StoredFile>,
}

impl StoredDocument {
    /// Finds the shader definition entry.
    ///
    /// Prefers the file named `preferred`, otherwise the first file whose
    /// name ends in `.json`.
    pub fn shader_entry(&self, preferred: &str) -> Option<&StoredFile> {
        self.files
            .iter()
            .find(|file| file.name == preferred)
            .or_else(|| self.files.iter().find(|file| file.name.ends_with(".json")))
    }
}

/// A new document to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub filename: String,
    pub description: String,
    pub content: String,
    pub public: bool,
}

impl NewDocument {
    /// Builds a document named after `name`.
    ///
    /// The file is `<title>.json` and the description `<prefix><title>`,
    /// where the title is `name` without surrounding whitespace or a
    /// trailing `.json`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the title is empty.
    pub fn titled(name: &str, prefix: &str, content: String, public: bool) -> Result<Self> {
        let name = name.trim();
        let title = name.strip_suffix(".json").unwrap_or(name).trim();
        if title.is_empty() {
            return Err(SyncError::config("document name must not be empty"));
        }

        Ok(Self {
            filename: format!("{}.json", title),
            description: format!("{}{}", prefix, title),
            content,
            public,
        })
    }
}

/// Trait for the external document store sessions are persisted to.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by identity.
    async fn fetch(&self, identity: &str) -> Result<StoredDocument>;

    /// Fetches the full raw body of a truncated file.
    async fn fetch_raw(&self, raw_url: &str) -> Result<String>;

    /// Creates a document.
    ///
    /// # Returns
    ///
    /// The identity of the new document.
    async fn create(&self, document: NewDocument) -> Result<String>;

    /// Login of the user the store is authenticated as, if any.
    async fn authenticated_user(&self) -> Result<Option<String>>;
}

/// Trait for downloading remote assets.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Downloads `url`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure or a non-success status.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
