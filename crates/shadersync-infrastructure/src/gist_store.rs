//! GistDocumentStore - session documents stored as GitHub gists.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shadersync_core::config::SyncConfig;
use shadersync_core::error::{Result, SyncError};
use shadersync_core::store::{DocumentStore, NewDocument, StoredDocument, StoredFile};
use std::time::Duration;

const USER_AGENT: &str = concat!("shadersync/", env!("CARGO_PKG_VERSION"));

/// Document store backed by the gists API.
#[derive(Clone)]
pub struct GistDocumentStore {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    /// File name → file object, in the order the API lists them
    files: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateGistRequest<'a> {
    description: &'a str,
    public: bool,
    files: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedGist {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

impl GistResponse {
    fn into_document(self) -> Result<StoredDocument> {
        let files = self
            .files
            .into_iter()
            .map(|(name, value)| {
                let file: GistFile = serde_json::from_value(value)
                    .map_err(|e| SyncError::decode(format!("gist file '{}'", name), e.to_string()))?;
                Ok(StoredFile {
                    name,
                    content: file.content,
                    truncated: file.truncated,
                    raw_url: file.raw_url,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StoredDocument { files })
    }
}

impl GistDocumentStore {
    /// Creates a store with explicit configuration.
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            timeout,
        }
    }

    pub fn from_config(config: &SyncConfig, token: Option<String>) -> Self {
        tracing::info!(
            "[GistStore] Initialized with URL: {}, token: {}",
            config.store_url,
            if token.is_some() { "present" } else { "none" }
        );
        Self::new(config.store_url.clone(), token, config.request_timeout())
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Adds the headers every API request carries, plus the token if any.
    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .timeout(self.timeout)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request.header("Authorization", format!("token {}", token))
        } else {
            request
        }
    }

    async fn send(&self, context: &str, request: RequestBuilder) -> Result<Response> {
        self.auth_request(request)
            .send()
            .await
            .map_err(|e| SyncError::transport(context, e.to_string()))
    }
}

/// Maps a non-success response to an error, consuming its body for context.
async fn status_error(context: &str, id: &str, response: Response) -> SyncError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error_for_status(context, id, status, &body)
}

/// Error for a non-success `status`.
///
/// - 404 → `NotFound`
/// - 401 / 403 → `Unauthorized`
/// - anything else → `Transport` carrying the body
fn error_for_status(context: &str, id: &str, status: StatusCode, body: &str) -> SyncError {
    match status {
        StatusCode::NOT_FOUND => SyncError::not_found("document", id),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SyncError::Unauthorized(format!("{} ({})", context, status))
        }
        _ => SyncError::transport(context, format!("{}: {}", status, body)),
    }
}

/// Whether a `/user` status means the token is no longer valid, which reads
/// as logged out rather than as a failure.
fn is_logged_out(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED
}

#[async_trait]
impl DocumentStore for GistDocumentStore {
    async fn fetch(&self, identity: &str) -> Result<StoredDocument> {
        let url = format!("{}/gists/{}", self.base_url, identity);
        let context = format!("GET {}", url);
        tracing::debug!("[GistStore] Fetching gist {}", identity);

        let response = self.send(&context, self.client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(status_error(&context, identity, response).await);
        }

        let gist: GistResponse = response
            .json()
            .await
            .map_err(|e| SyncError::decode("gist response", e.to_string()))?;
        gist.into_document()
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<String> {
        let context = format!("GET {}", raw_url);
        tracing::debug!("[GistStore] Fetching raw content {}", raw_url);

        let response = self.send(&context, self.client.get(raw_url)).await?;
        if !response.status().is_success() {
            return Err(status_error(&context, raw_url, response).await);
        }

        response
            .text()
            .await
            .map_err(|e| SyncError::transport(context, e.to_string()))
    }

    async fn create(&self, document: NewDocument) -> Result<String> {
        if self.token.is_none() {
            return Err(SyncError::Unauthorized(
                "a token is required to create gists".to_string(),
            ));
        }

        let url = format!("{}/gists", self.base_url);
        let context = format!("POST {}", url);

        let mut files = Map::new();
        files.insert(
            document.filename.clone(),
            serde_json::json!({ "content": document.content }),
        );
        let body = CreateGistRequest {
            description: &document.description,
            public: document.public,
            files,
        };

        let response = self
            .send(&context, self.client.post(&url).json(&body))
            .await?;
        if !response.status().is_success() {
            return Err(status_error(&context, &document.filename, response).await);
        }

        let created: CreatedGist = response
            .json()
            .await
            .map_err(|e| SyncError::decode("gist response", e.to_string()))?;
        tracing::info!("[GistStore] Created gist {} ({})", created.id, document.filename);
        Ok(created.id)
    }

    async fn authenticated_user(&self) -> Result<Option<String>> {
        if self.token.is_none() {
            return Ok(None);
        }

        let url = format!("{}/user", self.base_url);
        let context = format!("GET {}", url);
        let response = self.send(&context, self.client.get(&url)).await?;

        match response.status() {
            status if status.is_success() => {
                let user: UserResponse = response
                    .json()
                    .await
                    .map_err(|e| SyncError::decode("user response", e.to_string()))?;
                Ok(Some(user.login))
            }
            status if is_logged_out(status) => {
                tracing::warn!("[GistStore] Token rejected, treating as logged out");
                Ok(None)
            }
            _ => Err(status_error(&context, "user", response).await),
        }
    }
}
