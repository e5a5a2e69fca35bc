//! Infrastructure layer for shadersync.
//!
//! HTTP adapters for the document store and asset downloads, plus the
//! file-backed configuration.

pub mod config_service;
pub mod gist_store;
pub mod http_fetcher;
pub mod paths;

pub use config_service::ConfigService;
pub use gist_store::GistDocumentStore;
pub use http_fetcher::HttpAssetFetcher;
pub use paths::{PathError, ShaderSyncPaths};
