//! Composition root.
//!
//! Wires the runtime handle, bridge, pipeline and front-end services around
//! a single session and runs the boot sequence.

use crate::diagnostics::Diagnostics;
use crate::drop_handler::DropHandler;
use crate::edit_channel::EditChannel;
use crate::ingestion::{AssetIngestionPipeline, RetryPolicy};
use crate::serializer::{LoadOutcome, SessionSerializer};
use crate::session::CurrentSession;
use crate::view_toggles::ViewToggles;
use shadersync_core::bridge::CommandBridge;
use shadersync_core::config::SyncConfig;
use shadersync_core::console::Console;
use shadersync_core::editor::EditorView;
use shadersync_core::error::Result;
use shadersync_core::loader::LoaderCounter;
use shadersync_core::runtime::{FullscreenControl, RuntimeBoundary, RuntimeHandle};
use shadersync_core::session::Session;
use shadersync_core::store::{AssetFetcher, DocumentStore};
use std::sync::Arc;

/// External collaborators a [`Workbench`] is built from.
pub struct Collaborators {
    pub runtime: Arc<dyn RuntimeBoundary>,
    pub fullscreen: Arc<dyn FullscreenControl>,
    pub editor: Arc<dyn EditorView>,
    pub store: Arc<dyn DocumentStore>,
    pub fetcher: Arc<dyn AssetFetcher>,
    pub console: Console,
}

/// Owns the one runtime handle and the one current session of a page.
pub struct Workbench {
    config: SyncConfig,
    runtime: Arc<RuntimeHandle>,
    bridge: Arc<CommandBridge>,
    editor: Arc<dyn EditorView>,
    session: Arc<CurrentSession>,
    loader: LoaderCounter,
    pipeline: Arc<AssetIngestionPipeline>,
    edits: Arc<EditChannel>,
    serializer: SessionSerializer,
    drops: DropHandler,
    diagnostics: Diagnostics,
    toggles: ViewToggles,
}

impl Workbench {
    pub fn new(config: SyncConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            runtime,
            fullscreen,
            editor,
            store,
            fetcher,
            console,
        } = collaborators;

        let runtime = Arc::new(RuntimeHandle::new(runtime));
        let bridge = Arc::new(CommandBridge::new(
            runtime.clone(),
            fullscreen,
            console.clone(),
        ));
        let session = Arc::new(CurrentSession::new(Session::with_defaults()));
        let loader = LoaderCounter::new();

        let pipeline = Arc::new(AssetIngestionPipeline::new(
            bridge.clone(),
            fetcher,
            session.clone(),
            loader.clone(),
            RetryPolicy::from_config(&config),
        ));
        let edits = Arc::new(EditChannel::new(
            bridge.clone(),
            editor.clone(),
            session.clone(),
            config.debounce(),
        ));
        let serializer = SessionSerializer::new(
            bridge.clone(),
            editor.clone(),
            session.clone(),
            store,
            pipeline.clone(),
            loader.clone(),
            config.clone(),
        );
        let drops = DropHandler::new(
            bridge.clone(),
            editor.clone(),
            session.clone(),
            pipeline.clone(),
            loader.clone(),
        );
        let diagnostics = Diagnostics::new(console, editor.clone());
        let toggles = ViewToggles::new(bridge.clone());

        Self {
            config,
            runtime,
            bridge,
            editor,
            session,
            loader,
            pipeline,
            edits,
            serializer,
            drops,
            diagnostics,
            toggles,
        }
    }

    /// Boots the page.
    ///
    /// Shows the active source, starts the readiness poll and waits for the
    /// runtime. Then loads `identity` if one was given, or pushes the
    /// active source. The loader stays busy until the runtime is ready.
    ///
    /// # Errors
    ///
    /// - `RuntimeLost` if the runtime is lost before it becomes ready
    /// - Any error of [`SessionSerializer::load`]
    pub async fn start(&self, identity: Option<&str>) -> Result<Option<LoadOutcome>> {
        let booting = self.loader.guard(None);
        self.editor
            .set_value(&self.session.source(self.session.active_slot()));

        let _poll = self
            .runtime
            .start_readiness_poll(self.config.poll_interval());
        self.runtime.wait_ready().await?;
        drop(booting);
        tracing::info!("[Bootstrap] Runtime ready");

        match identity {
            Some(identity) => self.serializer.load(identity).await.map(Some),
            None => {
                self.edits.flush_now();
                Ok(None)
            }
        }
    }

    /// Latches runtime loss. Reported once on the console.
    pub fn on_context_lost(&self, cause: &str) {
        if self.runtime.is_lost() {
            return;
        }
        self.runtime.on_loss(cause);
        self.bridge
            .console()
            .error(format!("Runtime lost ({}). Reload the page to continue.", cause));
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Arc<RuntimeHandle> {
        &self.runtime
    }

    pub fn bridge(&self) -> &Arc<CommandBridge> {
        &self.bridge
    }

    pub fn session(&self) -> &Arc<CurrentSession> {
        &self.session
    }

    pub fn loader(&self) -> &LoaderCounter {
        &self.loader
    }

    pub fn pipeline(&self) -> &Arc<AssetIngestionPipeline> {
        &self.pipeline
    }

    pub fn edits(&self) -> &Arc<EditChannel> {
        &self.edits
    }

    pub fn serializer(&self) -> &SessionSerializer {
        &self.serializer
    }

    pub fn drops(&self) -> &DropHandler {
        &self.drops
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn toggles(&self) -> &ViewToggles {
        &self.toggles
    }
}
