//! Session save, load and publish.

use crate::ingestion::{AssetIngestionPipeline, IngestionReport};
use crate::session::{CurrentSession, SessionTicket};
use shadersync_core::bridge::CommandBridge;
use shadersync_core::config::SyncConfig;
use shadersync_core::editor::EditorView;
use shadersync_core::error::{Result, SyncError};
use shadersync_core::loader::LoaderCounter;
use shadersync_core::session::{Document, Slot, parse_identity, retained_state};
use shadersync_core::store::{DocumentStore, NewDocument};
use std::sync::Arc;

/// How a call to [`SessionSerializer::load`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The identity was already current; nothing was fetched
    AlreadyCurrent,
    /// Sources applied, assets ingested and commands replayed
    Loaded(IngestionReport),
    /// A newer load took over before this one finished
    Superseded,
}

/// Converts between the live session and its persisted [`Document`].
///
/// # Responsibilities
///
/// - Snapshotting sources, assets and retained runtime state on save
/// - Fetching, parsing and applying stored documents on load
/// - Guarding loads so the same identity is never applied twice
/// - Publishing the saved document to the store
pub struct SessionSerializer {
    bridge: Arc<CommandBridge>,
    editor: Arc<dyn EditorView>,
    session: Arc<CurrentSession>,
    store: Arc<dyn DocumentStore>,
    pipeline: Arc<AssetIngestionPipeline>,
    loader: LoaderCounter,
    config: SyncConfig,
}

impl SessionSerializer {
    pub fn new(
        bridge: Arc<CommandBridge>,
        editor: Arc<dyn EditorView>,
        session: Arc<CurrentSession>,
        store: Arc<dyn DocumentStore>,
        pipeline: Arc<AssetIngestionPipeline>,
        loader: LoaderCounter,
        config: SyncConfig,
    ) -> Self {
        Self {
            bridge,
            editor,
            session,
            store,
            pipeline,
            loader,
            config,
        }
    }

    /// Builds the persisted form of the current session.
    ///
    /// The editor text is snapshotted into the active slot first. Commands
    /// are the command history followed by every allowlisted runtime toggle
    /// that is not `off`.
    pub fn save(&self) -> Document {
        let active = self.session.active_slot();
        self.session.set_source(active, self.editor.value());

        let commands = retained_state(&self.bridge.history(), |name| self.bridge.query(name));
        let session = self.session.snapshot();

        Document {
            frag: session.source(Slot::Fragment).to_string(),
            vert: session.source(Slot::Vertex).to_string(),
            assets: session.assets,
            commands,
        }
    }

    /// Loads a stored document into the session.
    ///
    /// `input` may be a bare identity or a URL ending in one. Loading the
    /// current identity again is a no-op. Any failure before sources are
    /// applied aborts the load, is reported on the console and frees the
    /// identity so the load can be retried.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `input` holds no identity or the document has no
    ///   shader definition
    /// - `Transport` if the store cannot be reached
    /// - `Decode` if the shader definition is malformed
    pub async fn load(&self, input: &str) -> Result<LoadOutcome> {
        let identity =
            parse_identity(input).ok_or_else(|| SyncError::not_found("document", input))?;

        let Some(ticket) = self.session.claim(&identity) else {
            tracing::info!("[Serializer] Document {} already loading/loaded", identity);
            return Ok(LoadOutcome::AlreadyCurrent);
        };

        let _loading = self.loader.guard(Some("Loading document..."));
        tracing::info!("[Serializer] Loading document {}", identity);

        let document = match self.fetch_document(&identity).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("[Serializer] Failed to load {}: {}", identity, e);
                self.bridge
                    .console()
                    .error(format!("Error loading document {}: {}", identity, e));
                self.session.release(&ticket);
                return Err(e);
            }
        };

        if !self.session.is_current(&ticket) {
            tracing::info!("[Serializer] Load of {} superseded before apply", identity);
            return Ok(LoadOutcome::Superseded);
        }

        Ok(self.apply(document, ticket).await)
    }

    /// Publishes the saved session as `<name>.json`.
    ///
    /// # Returns
    ///
    /// The identity of the created document, which becomes the session's
    /// identity.
    ///
    /// # Errors
    ///
    /// - `Config` for an empty name
    /// - `Unauthorized` if the store has no authenticated user
    /// - `Transport` if the store rejects the document
    pub async fn publish(&self, name: &str) -> Result<String> {
        let request = NewDocument::titled(
            name,
            &self.config.description_prefix,
            String::new(),
            self.config.public_documents,
        )?;

        let user = self
            .store
            .authenticated_user()
            .await?
            .ok_or_else(|| SyncError::Unauthorized("log in to publish documents".to_string()))?;

        let request = NewDocument {
            content: self.save().to_json_pretty()?,
            ..request
        };
        let filename = request.filename.clone();

        let identity = self.store.create(request).await.inspect_err(|e| {
            self.bridge.console().error(format!("Save failed: {}", e));
        })?;

        tracing::info!("[Serializer] Published {} as {} for {}", filename, identity, user);
        self.bridge
            .console()
            .log(format!("Saved to document: {}", identity));
        self.session.adopt_identity(identity.as_str());
        Ok(identity)
    }

    async fn fetch_document(&self, identity: &str) -> Result<Document> {
        let stored = self.store.fetch(identity).await?;
        let entry = stored
            .shader_entry(&self.config.document_name)
            .ok_or_else(|| SyncError::not_found("shader definition", identity))?;

        let body = match (&entry.content, entry.truncated) {
            (Some(content), false) => content.clone(),
            _ => {
                let raw_url = entry.raw_url.as_deref().ok_or_else(|| {
                    SyncError::decode("document", format!("'{}' has no raw URL", entry.name))
                })?;
                self.loader.update("Fetching raw document content...");
                self.store.fetch_raw(raw_url).await?
            }
        };

        Document::from_json(&body)
    }

    async fn apply(&self, document: Document, ticket: SessionTicket) -> LoadOutcome {
        self.session.with(|session| {
            if !document.frag.is_empty() {
                session.set_source(Slot::Fragment, document.frag.as_str());
            }
            if !document.vert.is_empty() {
                session.set_source(Slot::Vertex, document.vert.as_str());
            }
            session.assets = document.assets.clone();
        });

        let active = self.session.active_slot();
        let text = self.session.source(active);
        self.editor.set_value(&text);
        self.bridge.set_source(active, &text);

        let report = self.pipeline.ingest(&document.assets, ticket).await;
        if !self.session.is_current(&ticket) {
            tracing::info!("[Serializer] Load superseded during ingestion");
            return LoadOutcome::Superseded;
        }

        for command in &document.commands {
            self.bridge.send_command(command);
        }

        // Asset follow-ups may have swapped in the default scene
        for slot in [Slot::Fragment, Slot::Vertex] {
            self.bridge.set_source(slot, &self.session.source(slot));
        }

        tracing::info!(
            "[Serializer] Loaded {} asset(s), replayed {} command(s)",
            report.jobs().len(),
            document.commands.len()
        );
        LoadOutcome::Loaded(report)
    }
}
