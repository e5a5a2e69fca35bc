mod common;

use common::{harness, harness_with};
use shadersync_application::{DropOutcome, LoadOutcome};
use shadersync_core::config::SyncConfig;
use shadersync_core::console::{ConsoleEvent, drain};
use shadersync_core::editor::EditorView;
use shadersync_core::runtime::FullscreenControl;
use shadersync_core::session::{AssetSource, DEFAULT_FRAGMENT, Slot};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_start_without_identity_pushes_active_source() {
    let h = harness();
    h.runtime.set_ready(true);

    let outcome = h.workbench.start(None).await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(h.editor.value(), DEFAULT_FRAGMENT);
    assert_eq!(h.runtime.frag_pushes(), vec![DEFAULT_FRAGMENT.to_string()]);
    assert!(!h.workbench.loader().is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_start_with_zero_poll_interval_completes() {
    let h = harness_with(SyncConfig {
        poll_interval_ms: 0,
        ..SyncConfig::default()
    });
    h.runtime.set_ready(true);

    let outcome = tokio::time::timeout(Duration::from_secs(5), h.workbench.start(None))
        .await
        .expect("start finished");

    assert!(outcome.unwrap().is_none());
    assert_eq!(h.runtime.frag_pushes(), vec![DEFAULT_FRAGMENT.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_start_waits_for_runtime_then_loads_identity() {
    let h = harness();
    h.store
        .put_shader("abc123", r#"{"frag": "loaded", "vert": "v"}"#);

    let (outcome, _) = tokio::join!(h.workbench.start(Some("abc123")), async {
        tokio::time::sleep(Duration::from_millis(1_200)).await;
        assert!(h.workbench.loader().is_busy());
        assert_eq!(h.store.fetches(), 0);
        h.runtime.set_ready(true);
    });

    assert!(matches!(outcome.unwrap(), Some(LoadOutcome::Loaded(_))));
    assert_eq!(h.editor.value(), "loaded");
    assert!(!h.workbench.loader().is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_loss_before_ready_aborts_start() {
    let h = harness();

    let (outcome, _) = tokio::join!(h.workbench.start(None), async {
        tokio::time::sleep(Duration::from_millis(700)).await;
        h.workbench.on_context_lost("webglcontextlost");
    });

    assert!(outcome.unwrap_err().is_runtime_lost());
    assert!(!h.workbench.loader().is_busy());
    assert!(h.runtime.frag_pushes().is_empty());
}

#[tokio::test]
async fn test_bridge_drops_everything_after_loss() {
    let mut h = harness();
    h.make_ready();
    h.workbench.on_context_lost("webglcontextlost");
    h.workbench.on_context_lost("again");

    assert_eq!(h.workbench.bridge().send_command("sky,on"), None);
    assert!(h.runtime.commands().is_empty());
    assert_eq!(h.console_errors().len(), 1);
}

#[tokio::test]
async fn test_dropped_fragment_file_goes_through_active_editor() {
    let h = harness();
    h.make_ready();

    let outcome = h.workbench.drops().drop_file("wave.FS", b"dropped frag").await;

    assert_eq!(outcome, DropOutcome::Source(Slot::Fragment));
    assert_eq!(h.editor.value(), "dropped frag");
    assert_eq!(h.workbench.session().source(Slot::Fragment), "dropped frag");
    assert!(h.runtime.frag_pushes().is_empty());
    assert!(!h.workbench.loader().is_busy());
}

#[tokio::test]
async fn test_dropped_vertex_file_is_pushed_directly_when_inactive() {
    let h = harness();
    h.make_ready();

    let outcome = h.workbench.drops().drop_file("mesh.vert", b"dropped vert").await;

    assert_eq!(outcome, DropOutcome::Source(Slot::Vertex));
    assert_eq!(h.runtime.vert_pushes(), vec!["dropped vert".to_string()]);
    assert_eq!(h.editor.value(), "");
}

#[tokio::test]
async fn test_dropped_mesh_adopts_default_scene_on_untouched_sources() {
    let h = harness();
    h.make_ready();
    h.runtime.set_default_scene("scene frag", "scene vert");

    let outcome = h.workbench.drops().drop_file("bunny.ply", b"ply\n").await;

    let DropOutcome::Asset {
        report,
        scene_adopted,
    } = outcome
    else {
        panic!("expected an asset drop");
    };
    assert!(scene_adopted);
    assert!(report.job("bunny.ply").unwrap().is_applied());
    assert_eq!(h.workbench.session().source(Slot::Fragment), "scene frag");
    assert_eq!(h.workbench.session().source(Slot::Vertex), "scene vert");
    assert_eq!(h.editor.value(), "scene frag");
    assert_eq!(h.runtime.commands(), vec!["sky,on".to_string()]);
    assert!(
        h.workbench
            .session()
            .assets()
            .get("bunny.ply")
            .unwrap()
            .is_inline()
    );
}

#[tokio::test]
async fn test_dropped_texture_repushes_edited_sources() {
    let mut h = harness();
    h.make_ready();
    h.workbench.session().set_source(Slot::Fragment, "mine");

    let outcome = h.workbench.drops().drop_file("tex.png", &[0, 0, 0]).await;

    assert!(matches!(
        outcome,
        DropOutcome::Asset {
            scene_adopted: false,
            ..
        }
    ));
    assert_eq!(
        h.workbench.session().assets().get("tex.png"),
        Some(&AssetSource::from(
            "data:image/png;base64,AAAA".to_string()
        ))
    );
    assert_eq!(h.runtime.writes(), vec![("tex.png".to_string(), vec![0, 0, 0])]);
    assert_eq!(h.runtime.frag_pushes().last().unwrap(), "mine");
    assert!(drain(&mut h.console).contains(&ConsoleEvent::Clear));
}

#[tokio::test]
async fn test_stderr_marks_editor_line() {
    let h = harness();
    h.editor.set_value("line 1\nline 2\nline 3");

    h.workbench.diagnostics().on_stderr("0:2: 'colour' : undeclared identifier");
    h.workbench.diagnostics().on_stderr("0:9: past the end");

    assert_eq!(h.editor.marked(), vec![1]);
}

#[tokio::test]
async fn test_view_toggles() {
    let h = harness();
    h.make_ready();
    h.runtime.set_value("plot", "fps");
    h.runtime.set_value("grid", "on");
    let toggles = h.workbench.toggles();

    assert_eq!(toggles.toggle("plot").unwrap().to_string(), "plot,rgb");
    assert_eq!(toggles.toggle("floor").unwrap().to_string(), "floor,on");
    assert_eq!(toggles.toggle("grid").unwrap().to_string(), "grid,off");
    assert!(toggles.toggle("wireframe").is_none());

    assert_eq!(
        toggles.toggle("fullscreen").unwrap().to_string(),
        "fullscreen,on"
    );
    assert!(h.screen.is_fullscreen());

    assert_eq!(
        h.runtime.commands(),
        vec![
            "plot,rgb".to_string(),
            "floor,on".to_string(),
            "grid,off".to_string(),
        ]
    );

    let states = toggles.states();
    assert_eq!(states[0], ("plot", "fps".to_string()));
    assert!(states.contains(&("fullscreen", "on".to_string())));
}
