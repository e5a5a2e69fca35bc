//! Plain HTTP asset downloads.

use async_trait::async_trait;
use reqwest::Client;
use shadersync_core::config::SyncConfig;
use shadersync_core::error::{Result, SyncError};
use shadersync_core::store::AssetFetcher;
use std::time::Duration;

/// Downloads remote assets with a per-request timeout.
#[derive(Clone)]
pub struct HttpAssetFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpAssetFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.request_timeout())
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("[HttpFetcher] GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SyncError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::transport(
                url,
                format!(
                    "{} ({})",
                    status.canonical_reason().unwrap_or("Unknown status"),
                    status.as_u16()
                ),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::transport(url, e.to_string()))?;
        tracing::debug!("[HttpFetcher] {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
