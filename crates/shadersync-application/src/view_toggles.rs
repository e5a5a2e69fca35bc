//! View menu toggles.

use shadersync_core::bridge::{Command, CommandBridge};
use shadersync_core::session::{PLOT_MODES, STATE_COMMANDS};
use std::sync::Arc;

/// Flips allowlisted runtime toggles based on their queried state.
pub struct ViewToggles {
    bridge: Arc<CommandBridge>,
}

impl ViewToggles {
    pub fn new(bridge: Arc<CommandBridge>) -> Self {
        Self { bridge }
    }

    /// Advances `name` to its next state.
    ///
    /// `plot` cycles through its modes, every other toggle flips between
    /// `on` and `off`. An unanswered query counts as `off`.
    ///
    /// # Returns
    ///
    /// The command sent, or `None` for names outside the allowlist.
    pub fn toggle(&self, name: &str) -> Option<Command> {
        if !STATE_COMMANDS.contains(&name) {
            tracing::debug!("[ViewToggles] Ignoring unknown toggle '{}'", name);
            return None;
        }

        let current = self.current(name);
        let command = if name == "plot" {
            Command::new(name).arg(next_plot_mode(&current))
        } else {
            Command::toggle(name, current != "on")
        };

        self.bridge.send(&command);
        Some(command)
    }

    /// Current value of every allowlisted toggle, in menu order.
    pub fn states(&self) -> Vec<(&'static str, String)> {
        STATE_COMMANDS
            .iter()
            .map(|&name| (name, self.current(name)))
            .collect()
    }

    fn current(&self, name: &str) -> String {
        self.bridge.query(name).unwrap_or_else(|| "off".to_string())
    }
}

fn next_plot_mode(current: &str) -> &'static str {
    // An unknown mode resets to `off`
    let index = PLOT_MODES.iter().position(|mode| *mode == current);
    let next = index.map_or(0, |index| (index + 1) % PLOT_MODES.len());
    PLOT_MODES[next]
}
