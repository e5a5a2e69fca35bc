//! Files dropped onto the page.

use crate::ingestion::{AssetIngestionPipeline, IngestionReport, SCENE_EXTENSIONS};
use crate::session::CurrentSession;
use shadersync_core::bridge::{Command, CommandBridge};
use shadersync_core::editor::EditorView;
use shadersync_core::loader::LoaderCounter;
use shadersync_core::session::{AssetMap, AssetSource, DataUrl, Slot, SlotPair, asset_extension};
use std::sync::Arc;

/// What a dropped file became.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The file replaced a source slot
    Source(Slot),
    /// The file was stored as an inline asset and ingested
    Asset {
        report: IngestionReport,
        /// Whether the runtime's default scene sources were adopted
        scene_adopted: bool,
    },
}

/// Routes dropped files to a source slot or to the asset pipeline.
pub struct DropHandler {
    bridge: Arc<CommandBridge>,
    editor: Arc<dyn EditorView>,
    session: Arc<CurrentSession>,
    pipeline: Arc<AssetIngestionPipeline>,
    loader: LoaderCounter,
}

impl DropHandler {
    pub fn new(
        bridge: Arc<CommandBridge>,
        editor: Arc<dyn EditorView>,
        session: Arc<CurrentSession>,
        pipeline: Arc<AssetIngestionPipeline>,
        loader: LoaderCounter,
    ) -> Self {
        Self {
            bridge,
            editor,
            session,
            pipeline,
            loader,
        }
    }

    /// Handles one dropped file.
    ///
    /// `frag`/`fs` and `vert`/`vs` files replace the matching source. The
    /// active slot goes through the editor, the other one straight to the
    /// runtime. Anything else becomes an inline asset.
    pub async fn drop_file(&self, name: &str, bytes: &[u8]) -> DropOutcome {
        let _loading = self.loader.guard(None);
        let extension = asset_extension(name);

        match Slot::from_extension(&extension) {
            Some(slot) => {
                self.replace_source(slot, &String::from_utf8_lossy(bytes));
                DropOutcome::Source(slot)
            }
            None => self.ingest_asset(name, &extension, bytes).await,
        }
    }

    fn replace_source(&self, slot: Slot, text: &str) {
        tracing::info!("[Drop] Replacing {} source", slot);
        self.session.set_source(slot, text);
        if self.session.active_slot() == slot {
            self.editor.set_value(text);
        } else {
            self.bridge.set_source(slot, text);
        }
    }

    async fn ingest_asset(&self, name: &str, extension: &str, bytes: &[u8]) -> DropOutcome {
        let media_type = mime_guess::from_path(name).first_or_octet_stream();
        let source = AssetSource::Inline(DataUrl::encode(media_type.essence_str(), bytes));
        tracing::info!("[Drop] Storing {} as {} asset", name, media_type);

        self.session.put_asset(name, source.clone());
        let mut assets = AssetMap::new();
        assets.insert(name, source);
        let report = self.pipeline.ingest(&assets, self.session.ticket()).await;

        let replaces_scene = SCENE_EXTENSIONS.contains(&extension);
        let scene_adopted = if self.session.has_default_sources() && replaces_scene {
            self.bridge.runtime().is_ready() && self.adopt_default_scene(&report)
        } else {
            self.bridge.console().clear();
            for slot in [Slot::Fragment, Slot::Vertex] {
                self.bridge.set_source(slot, &self.session.source(slot));
            }
            false
        };

        DropOutcome::Asset {
            report,
            scene_adopted,
        }
    }

    /// Takes over the runtime's default scene sources while the user has not
    /// written any code yet.
    fn adopt_default_scene(&self, report: &IngestionReport) -> bool {
        let sources = report.scene_sources().cloned().unwrap_or_else(|| {
            SlotPair::new(
                self.bridge.default_source(Slot::Fragment),
                self.bridge.default_source(Slot::Vertex),
            )
        });

        for slot in [Slot::Fragment, Slot::Vertex] {
            if let Some(text) = sources.get(slot) {
                self.session.set_source(slot, text.as_str());
            }
        }

        let text = self.session.source(self.session.active_slot());
        if self.editor.value() != text {
            self.editor.set_value(&text);
        }

        self.bridge.send(&Command::toggle("sky", true));
        true
    }
}
