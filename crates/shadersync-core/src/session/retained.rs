/// Toggle-like runtime state that is re-emitted on save.
pub const STATE_COMMANDS: &[&str] = &[
    "plot",
    "textures",
    "buffers",
    "floor",
    "sky",
    "cubemap",
    "axis",
    "grid",
    "bboxes",
    "fullscreen",
];

/// Camera state that is re-emitted on save.
pub const CAMERA_COMMANDS: &[&str] = &["camera_position", "camera_look_at"];

/// Modes `plot` cycles through, starting from the baseline.
pub const PLOT_MODES: &[&str] = &["off", "fps", "rgb", "luma"];

const BASELINE: &str = "off";

/// Builds the retained-state command list.
///
/// Starts from the command history, then appends `name,value` for every
/// allowlisted name whose queried value is present and not `off`. Duplicates
/// are dropped, keeping the first occurrence.
///
/// Multi-field values (camera vectors, plot modes) are persisted as-is.
pub fn retained_state<F>(history: &[String], mut query: F) -> Vec<String>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut names: Vec<&str> = Vec::new();
    for &name in STATE_COMMANDS.iter().chain(CAMERA_COMMANDS) {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let queried = names.into_iter().filter_map(|name| {
        query(name)
            .filter(|value| !value.is_empty() && value != BASELINE)
            .map(|value| format!("{},{}", name, value))
    });

    let mut results: Vec<String> = Vec::new();
    for command in history.iter().cloned().chain(queried) {
        if !results.contains(&command) {
            results.push(command);
        }
    }
    results
}
