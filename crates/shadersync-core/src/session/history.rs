/// Command prefixes worth remembering across a save.
///
/// These create scene geometry, which no query can reconstruct later.
pub const LISTENED_COMMANDS: &[&str] = &[
    "plane",
    "pcl_plane",
    "sphere",
    "pcl_sphere",
    "icosphere",
    "cylinder",
];

/// Append-only log of listenable commands, in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listenable(command: &str) -> bool {
        LISTENED_COMMANDS
            .iter()
            .any(|prefix| command.starts_with(prefix))
    }

    /// Records `command` if it is listenable.
    ///
    /// # Returns
    ///
    /// `true` if the command was recorded.
    pub fn record(&mut self, command: &str) -> bool {
        if !Self::is_listenable(command) {
            return false;
        }
        tracing::debug!("[History] Recorded command: {}", command);
        self.entries.push(command.to_string());
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
