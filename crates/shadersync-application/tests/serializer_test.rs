mod common;

use common::harness;
use shadersync_application::LoadOutcome;
use shadersync_application::ingestion::JobFailure;
use shadersync_core::editor::EditorView;
use shadersync_core::session::{AssetSource, DEFAULT_FRAGMENT, Document, Slot};
use shadersync_core::store::StoredFile;
use std::time::Duration;

fn file(name: &str, content: &str) -> StoredFile {
    StoredFile {
        name: name.to_string(),
        content: Some(content.to_string()),
        truncated: false,
        raw_url: None,
    }
}

#[tokio::test]
async fn test_save_keeps_only_toggles_that_are_not_off() {
    let h = harness();
    h.make_ready();
    h.runtime.set_value("floor", "on");
    h.editor.set_value("A");
    h.workbench.session().set_source(Slot::Vertex, "B");

    let document = h.workbench.serializer().save();

    assert_eq!(document.frag, "A");
    assert_eq!(document.vert, "B");
    assert!(document.assets.is_empty());
    assert_eq!(document.commands, vec!["floor,on".to_string()]);
    assert_eq!(
        document.to_json_pretty().unwrap(),
        "{\n  \"frag\": \"A\",\n  \"vert\": \"B\",\n  \"commands\": [\n    \"floor,on\"\n  ]\n}"
    );
}

#[tokio::test]
async fn test_save_puts_history_before_queried_state() {
    let h = harness();
    h.make_ready();
    h.runtime.set_value("sky", "on");
    h.runtime.set_value("camera_position", "0.0,0.0,5.0");
    h.workbench.bridge().send_command("sphere,2");
    h.workbench.bridge().send_command("sky,on");

    let document = h.workbench.serializer().save();

    assert_eq!(
        document.commands,
        vec![
            "sphere,2".to_string(),
            "sky,on".to_string(),
            "camera_position,0.0,0.0,5.0".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_loading_same_identity_twice_fetches_once() {
    let h = harness();
    h.make_ready();
    h.store
        .put_shader("abc123", r#"{"frag": "void main() {}", "vert": ""}"#);
    let serializer = h.workbench.serializer();

    let first = serializer.load("abc123").await.unwrap();
    let pushes = h.runtime.frag_pushes().len();
    let second = serializer.load("abc123").await.unwrap();

    assert!(matches!(first, LoadOutcome::Loaded(_)));
    assert_eq!(second, LoadOutcome::AlreadyCurrent);
    assert_eq!(h.store.fetches(), 1);
    assert_eq!(h.runtime.frag_pushes().len(), pushes);
}

#[tokio::test]
async fn test_load_applies_sources_assets_and_commands() {
    let h = harness();
    h.make_ready();
    h.store.put_shader(
        "abc123",
        r#"{
            "frag": "frag source",
            "vert": "vert source",
            "assets": {"tex.png": "data:image/png;base64,AAAA"},
            "commands": ["sphere", "floor,on"]
        }"#,
    );

    let outcome = h.workbench.serializer().load("abc123").await.unwrap();

    let LoadOutcome::Loaded(report) = outcome else {
        panic!("expected a completed load");
    };
    assert!(report.job("tex.png").unwrap().is_applied());
    assert_eq!(h.editor.value(), "frag source");
    assert_eq!(h.workbench.session().source(Slot::Vertex), "vert source");
    assert_eq!(
        h.runtime.commands(),
        vec!["sphere".to_string(), "floor,on".to_string()]
    );
    assert_eq!(h.runtime.frag_pushes().last().unwrap(), "frag source");
    assert_eq!(h.runtime.vert_pushes().last().unwrap(), "vert source");
    assert_eq!(h.workbench.session().identity().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_failed_remote_asset_does_not_block_source_push() {
    let mut h = harness();
    h.make_ready();
    h.store.put_shader(
        "abc123",
        r#"{"frag": "F", "vert": "V", "assets": {"bunny.obj": "https://cdn.example.com/bunny.obj"}}"#,
    );

    let outcome = h.workbench.serializer().load("abc123").await.unwrap();

    let LoadOutcome::Loaded(report) = outcome else {
        panic!("expected a completed load");
    };
    assert!(report.is_settled());
    assert!(matches!(
        report.job("bunny.obj").unwrap().failure(),
        Some(JobFailure::Transport(_))
    ));
    assert_eq!(h.runtime.frag_pushes().last().unwrap(), "F");
    assert_eq!(h.runtime.vert_pushes().last().unwrap(), "V");
    assert_eq!(h.console_errors().len(), 1);
}

#[tokio::test]
async fn test_empty_fields_keep_current_sources() {
    let h = harness();
    h.make_ready();
    h.store.put_shader("abc123", r#"{"vert": "only vert"}"#);

    h.workbench.serializer().load("abc123").await.unwrap();

    assert_eq!(h.workbench.session().source(Slot::Fragment), DEFAULT_FRAGMENT);
    assert_eq!(h.workbench.session().source(Slot::Vertex), "only vert");
}

#[tokio::test]
async fn test_truncated_entry_is_refetched_from_raw_url() {
    let h = harness();
    h.make_ready();
    h.store.put(
        "big",
        vec![StoredFile {
            name: "shader.json".to_string(),
            content: Some(r#"{"frag": "cut"#.to_string()),
            truncated: true,
            raw_url: Some("https://raw.example.com/big/shader.json".to_string()),
        }],
    );
    h.store.put_raw(
        "https://raw.example.com/big/shader.json",
        r#"{"frag": "full body", "vert": "v"}"#,
    );

    h.workbench.serializer().load("big").await.unwrap();

    assert_eq!(h.workbench.session().source(Slot::Fragment), "full body");
}

#[tokio::test]
async fn test_first_json_entry_is_used_without_well_known_name() {
    let h = harness();
    h.make_ready();
    h.store.put(
        "abc123",
        vec![
            file("README.md", "# notes"),
            file("sunset.json", r#"{"frag": "sunset"}"#),
            file("other.json", r#"{"frag": "other"}"#),
        ],
    );

    h.workbench
        .serializer()
        .load("https://gist.github.com/someone/abc123")
        .await
        .unwrap();

    assert_eq!(h.workbench.session().source(Slot::Fragment), "sunset");
}

#[tokio::test]
async fn test_parse_failure_aborts_and_allows_retry() {
    let mut h = harness();
    h.make_ready();
    h.store.put_shader("abc123", "{ not json");
    let serializer = h.workbench.serializer();

    let error = serializer.load("abc123").await.unwrap_err();

    assert!(error.is_decode());
    assert!(h.runtime.frag_pushes().is_empty());
    assert_eq!(h.workbench.session().source(Slot::Fragment), DEFAULT_FRAGMENT);
    assert!(h.workbench.session().identity().is_none());
    assert_eq!(h.console_errors().len(), 1);
    assert!(!h.workbench.loader().is_busy());

    h.store
        .put_shader("abc123", r#"{"frag": "fixed", "vert": "v"}"#);
    let retried = h.workbench.serializer().load("abc123").await.unwrap();
    assert!(matches!(retried, LoadOutcome::Loaded(_)));
    assert_eq!(h.store.fetches(), 2);
}

#[tokio::test]
async fn test_document_without_shader_entry_is_not_found() {
    let h = harness();
    h.make_ready();
    h.store.put("abc123", vec![file("notes.txt", "hello")]);

    let error = h.workbench.serializer().load("abc123").await.unwrap_err();

    assert!(error.is_not_found());
    assert!(h.workbench.session().identity().is_none());
}

#[tokio::test]
async fn test_unreachable_document_releases_identity() {
    let h = harness();
    h.make_ready();

    let error = h.workbench.serializer().load("missing").await.unwrap_err();

    assert!(error.is_transport());
    assert!(h.workbench.session().identity().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_load_supersedes_older_one() {
    let h = harness();
    h.store.put_shader(
        "one",
        r#"{"frag": "one", "assets": {"a.png": "data:image/png;base64,AAAA"}, "commands": ["sphere"]}"#,
    );
    h.store.put_shader(
        "two",
        r#"{"frag": "two", "assets": {"b.png": "data:image/png;base64,AAAA"}, "commands": ["plane"]}"#,
    );
    let serializer = h.workbench.serializer();

    let (first, second) = tokio::join!(serializer.load("one"), async {
        tokio::time::sleep(Duration::from_millis(600)).await;
        h.runtime.set_ready(true);
        serializer.load("two").await
    });

    assert_eq!(first.unwrap(), LoadOutcome::Superseded);
    assert!(matches!(second.unwrap(), LoadOutcome::Loaded(_)));
    assert_eq!(h.runtime.commands(), vec!["plane".to_string()]);
    assert_eq!(h.runtime.writes().len(), 1);
    assert_eq!(h.runtime.writes()[0].0, "b.png");
    assert_eq!(h.workbench.session().source(Slot::Fragment), "two");
}

#[tokio::test]
async fn test_save_then_load_reproduces_session() {
    let source = harness();
    source.make_ready();
    source.runtime.set_value("floor", "on");
    source.runtime.set_value("plot", "fps");
    source.workbench.bridge().send_command("icosphere,3");
    source.editor.set_value("frag A");
    source.workbench.session().set_source(Slot::Vertex, "vert B");
    source.workbench.session().put_asset(
        "tex.png",
        AssetSource::from("data:image/png;base64,AAAA".to_string()),
    );
    let saved = source.workbench.serializer().save();

    let target = harness();
    target.make_ready();
    target
        .store
        .put_shader("saved", &saved.to_json_pretty().unwrap());
    target.workbench.serializer().load("saved").await.unwrap();

    let reloaded = target.workbench.session().snapshot();
    assert_eq!(reloaded.source(Slot::Fragment), "frag A");
    assert_eq!(reloaded.source(Slot::Vertex), "vert B");
    assert_eq!(reloaded.assets, saved.assets);

    let mut replayed = target.runtime.commands();
    let mut expected = saved.commands.clone();
    replayed.sort();
    expected.sort();
    assert_eq!(replayed, expected);
    assert_eq!(
        Document::from_json(&saved.to_json_pretty().unwrap()).unwrap(),
        saved
    );
}

#[tokio::test]
async fn test_publish_requires_login() {
    let h = harness();

    let error = h.workbench.serializer().publish("sunset").await.unwrap_err();

    assert!(matches!(
        error,
        shadersync_core::SyncError::Unauthorized(_)
    ));
    assert!(h.store.created().is_empty());
}

#[tokio::test]
async fn test_publish_stores_named_document() {
    let h = harness();
    h.make_ready();
    h.store.login("octocat");
    h.editor.set_value("published frag");

    let identity = h.workbench.serializer().publish("sunset").await.unwrap();

    let created = h.store.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].filename, "sunset.json");
    assert_eq!(created[0].description, "glslViewer Shader: sunset");
    assert!(created[0].public);
    let document = Document::from_json(&created[0].content).unwrap();
    assert_eq!(document.frag, "published frag");

    assert_eq!(identity, "new1");
    assert_eq!(
        h.workbench.serializer().load(&identity).await.unwrap(),
        LoadOutcome::AlreadyCurrent
    );
}
