//! Hand-written fakes for the collaborator traits.

#![allow(dead_code)]

use async_trait::async_trait;
use shadersync_application::{Collaborators, Workbench};
use shadersync_core::config::SyncConfig;
use shadersync_core::console::{Console, ConsoleEvent, drain};
use shadersync_core::editor::EditorView;
use shadersync_core::error::{Result, SyncError};
use shadersync_core::runtime::{FullscreenControl, RuntimeBoundary};
use shadersync_core::store::{AssetFetcher, DocumentStore, NewDocument, StoredDocument, StoredFile};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

// ============================================================================
// Runtime
// ============================================================================

#[derive(Default)]
pub struct FakeRuntime {
    script: AtomicBool,
    fs: AtomicBool,
    fail_writes: AtomicBool,
    writes: Mutex<Vec<(String, Vec<u8>)>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    values: Mutex<HashMap<String, String>>,
    scene: Mutex<(String, String)>,
}

impl FakeRuntime {
    pub fn set_ready(&self, ready: bool) {
        self.script.store(ready, Ordering::SeqCst);
        self.fs.store(ready, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Value answered to `query,<name>`. Unset names answer `off`.
    pub fn set_value(&self, name: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_default_scene(&self, frag: &str, vert: &str) {
        *self.scene.lock().unwrap() = (frag.to_string(), vert.to_string());
    }

    pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }

    /// Arguments of every call to `function`, in order.
    pub fn calls_to(&self, function: &str) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == function)
            .map(|(_, args)| args.clone())
            .collect()
    }

    /// Text of every `command` call.
    pub fn commands(&self) -> Vec<String> {
        self.calls_to("command")
            .into_iter()
            .filter_map(|args| args.into_iter().next())
            .collect()
    }

    /// Every source pushed through `setFrag`.
    pub fn frag_pushes(&self) -> Vec<String> {
        self.calls_to("setFrag")
            .into_iter()
            .filter_map(|args| args.into_iter().next())
            .collect()
    }

    pub fn vert_pushes(&self) -> Vec<String> {
        self.calls_to("setVert")
            .into_iter()
            .filter_map(|args| args.into_iter().next())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl RuntimeBoundary for FakeRuntime {
    fn is_script_ready(&self) -> bool {
        self.script.load(Ordering::SeqCst)
    }

    fn is_fs_ready(&self) -> bool {
        self.fs.load(Ordering::SeqCst)
    }

    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SyncError::runtime_call("FS error: EIO"));
        }
        self.writes
            .lock()
            .unwrap()
            .push((path.to_string(), bytes.to_vec()));
        Ok(())
    }

    fn call(&self, function: &str, args: &[&str]) -> Result<Option<String>> {
        self.calls.lock().unwrap().push((
            function.to_string(),
            args.iter().map(|arg| arg.to_string()).collect(),
        ));

        let answer = match function {
            "query" => Some(
                self.values
                    .lock()
                    .unwrap()
                    .get(args[0])
                    .cloned()
                    .unwrap_or_else(|| "off".to_string()),
            ),
            "getDefaultSceneFrag" => Some(self.scene.lock().unwrap().0.clone()),
            "getDefaultSceneVert" => Some(self.scene.lock().unwrap().1.clone()),
            _ => None,
        };
        Ok(answer)
    }
}

#[derive(Default)]
pub struct FakeScreen {
    fullscreen: AtomicBool,
}

impl FullscreenControl for FakeScreen {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.load(Ordering::SeqCst)
    }

    fn set_fullscreen(&self, on: bool) {
        self.fullscreen.store(on, Ordering::SeqCst);
    }
}

// ============================================================================
// Editor
// ============================================================================

#[derive(Default)]
pub struct FakeEditor {
    text: Mutex<String>,
    marked: Mutex<Vec<usize>>,
    clears: AtomicUsize,
}

impl FakeEditor {
    /// Simulates the user typing, without notifying anyone.
    pub fn type_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn marked(&self) -> Vec<usize> {
        self.marked.lock().unwrap().clone()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl EditorView for FakeEditor {
    fn value(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    fn set_value(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    fn line_count(&self) -> usize {
        self.text.lock().unwrap().lines().count()
    }

    fn mark_error_line(&self, line: usize) {
        self.marked.lock().unwrap().push(line);
    }

    fn clear_error_lines(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.marked.lock().unwrap().clear();
    }
}

// ============================================================================
// Store and fetcher
// ============================================================================

#[derive(Default)]
pub struct FakeStore {
    documents: Mutex<HashMap<String, StoredDocument>>,
    raw: Mutex<HashMap<String, String>>,
    fetches: AtomicUsize,
    created: Mutex<Vec<NewDocument>>,
    user: Mutex<Option<String>>,
}

impl FakeStore {
    /// Stores `body` as the single `shader.json` file of document `id`.
    pub fn put_shader(&self, id: &str, body: &str) {
        self.put(
            id,
            vec![StoredFile {
                name: "shader.json".to_string(),
                content: Some(body.to_string()),
                truncated: false,
                raw_url: None,
            }],
        );
    }

    pub fn put(&self, id: &str, files: Vec<StoredFile>) {
        self.documents
            .lock()
            .unwrap()
            .insert(id.to_string(), StoredDocument { files });
    }

    pub fn put_raw(&self, url: &str, body: &str) {
        self.raw
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub fn login(&self, user: &str) {
        *self.user.lock().unwrap() = Some(user.to_string());
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<NewDocument> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn fetch(&self, identity: &str) -> Result<StoredDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.documents
            .lock()
            .unwrap()
            .get(identity)
            .cloned()
            .ok_or_else(|| SyncError::transport("GET /gists", "404 Not Found"))
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<String> {
        self.raw
            .lock()
            .unwrap()
            .get(raw_url)
            .cloned()
            .ok_or_else(|| SyncError::transport(raw_url, "404 Not Found"))
    }

    async fn create(&self, document: NewDocument) -> Result<String> {
        let mut created = self.created.lock().unwrap();
        created.push(document);
        Ok(format!("new{}", created.len()))
    }

    async fn authenticated_user(&self) -> Result<Option<String>> {
        Ok(self.user.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeFetcher {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn serve(&self, url: &str, bytes: &[u8]) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        tokio::task::yield_now().await;
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SyncError::transport(url, "Not Found (404)"))
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub workbench: Workbench,
    pub runtime: Arc<FakeRuntime>,
    pub screen: Arc<FakeScreen>,
    pub editor: Arc<FakeEditor>,
    pub store: Arc<FakeStore>,
    pub fetcher: Arc<FakeFetcher>,
    pub console: UnboundedReceiver<ConsoleEvent>,
}

impl Harness {
    /// Marks the runtime ready and lets the handle observe it.
    pub fn make_ready(&self) {
        self.runtime.set_ready(true);
        assert!(self.workbench.runtime().observe_readiness());
    }

    /// Types into the editor and fires the change event, as the host does.
    pub fn type_and_edit(&self, text: &str) {
        self.editor.type_text(text);
        self.workbench.edits().on_edit();
    }

    pub fn console_lines(&mut self) -> Vec<(String, bool)> {
        drain(&mut self.console)
            .into_iter()
            .filter_map(|event| match event {
                ConsoleEvent::Line(line) => Some((line.text, line.is_error)),
                ConsoleEvent::Clear => None,
            })
            .collect()
    }

    pub fn console_errors(&mut self) -> Vec<String> {
        self.console_lines()
            .into_iter()
            .filter(|(_, is_error)| *is_error)
            .map(|(text, _)| text)
            .collect()
    }
}

pub fn harness() -> Harness {
    harness_with(SyncConfig::default())
}

pub fn harness_with(config: SyncConfig) -> Harness {
    let runtime = Arc::new(FakeRuntime::default());
    let screen = Arc::new(FakeScreen::default());
    let editor = Arc::new(FakeEditor::default());
    let store = Arc::new(FakeStore::default());
    let fetcher = Arc::new(FakeFetcher::default());
    let (console, receiver) = Console::channel();

    let workbench = Workbench::new(
        config,
        Collaborators {
            runtime: runtime.clone(),
            fullscreen: screen.clone(),
            editor: editor.clone(),
            store: store.clone(),
            fetcher: fetcher.clone(),
            console,
        },
    );

    Harness {
        workbench,
        runtime,
        screen,
        editor,
        store,
        fetcher,
        console: receiver,
    }
}
