//! Configuration service implementation.
//!
//! Loads [`SyncConfig`] from `config.toml` and the store token from
//! `secret.json`, falling back to the `GITHUB_TOKEN` environment variable.

use crate::paths::ShaderSyncPaths;
use shadersync_core::config::{SecretConfig, SyncConfig};
use shadersync_core::error::{Result, SyncError};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Configuration service that loads and caches the engine configuration.
///
/// Missing files are not errors: they yield the defaults.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: ShaderSyncPaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<SyncConfig>>>,
}

impl ConfigService {
    /// Creates a service rooted at the platform config directory, or at
    /// `base` when given.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            paths: ShaderSyncPaths::new(base),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if `config.toml` exists but is malformed.
    pub fn get_config(&self) -> Result<SyncConfig> {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load_config()?;
        *self
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Loads `secret.json`, or empty secrets when it does not exist.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let path = self.secret_path()?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SecretConfig::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Store token.
    ///
    /// Priority:
    /// 1. secret.json
    /// 2. Environment variable (GITHUB_TOKEN)
    pub fn github_token(&self) -> Option<String> {
        let from_secret = match self.load_secrets() {
            Ok(secrets) => secrets.github_token.filter(|token| !token.is_empty()),
            Err(e) => {
                tracing::debug!("[ConfigService] Failed to load secrets: {}", e);
                None
            }
        };

        from_secret.or_else(|| {
            env::var(TOKEN_ENV)
                .ok()
                .filter(|token| !token.is_empty())
                .inspect(|_| {
                    tracing::debug!("[ConfigService] Using {} for the store token", TOKEN_ENV)
                })
        })
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        self.paths
            .config_file()
            .map_err(|e| SyncError::config(e.to_string()))
    }

    fn secret_path(&self) -> Result<PathBuf> {
        self.paths
            .secret_file()
            .map_err(|e| SyncError::config(e.to_string()))
    }

    fn load_config(&self) -> Result<SyncConfig> {
        let path = self.config_path()?;
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!("[ConfigService] Loaded {}", path.display());
                Ok(toml::from_str(&text)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] {} not found, using defaults",
                    path.display()
                );
                Ok(SyncConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(None)
    }
}
