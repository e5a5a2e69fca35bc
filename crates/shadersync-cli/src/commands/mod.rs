pub mod inspect;
pub mod pack;
pub mod publish;
pub mod whoami;

use anyhow::{Context as _, Result};
use shadersync_core::config::SyncConfig;
use shadersync_infrastructure::{ConfigService, GistDocumentStore};
use std::path::Path;

/// Configuration and store shared by every subcommand.
pub struct Context {
    pub config: SyncConfig,
    pub store: GistDocumentStore,
}

impl Context {
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        let service = ConfigService::new(config_dir);
        let config = service
            .get_config()
            .context("Failed to load shadersync configuration")?;
        let token = service.github_token();
        tracing::debug!(
            "[Bootstrap] Store {} ({})",
            config.store_url,
            if token.is_some() { "token set" } else { "anonymous" }
        );

        let store = GistDocumentStore::from_config(&config, token);
        Ok(Self { config, store })
    }
}
