//! Runtime output routing.
//!
//! The host forwards the runtime's stdout and stderr events here. Compiler
//! errors of the form `0:<line>:<message>` highlight the offending line.

use once_cell::sync::Lazy;
use regex::Regex;
use shadersync_core::console::Console;
use shadersync_core::editor::EditorView;
use std::sync::Arc;

static ERROR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0:(\d+):(.*)$").expect("error line pattern"));

/// A compiler error pointing at a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLine {
    /// Zero-based editor line
    pub line: usize,
    pub message: String,
}

/// Parses a compiler error line. Line numbers are one-based on the wire.
pub fn parse_error_line(text: &str) -> Option<ErrorLine> {
    let captures = ERROR_LINE.captures(text)?;
    let number: usize = captures.get(1)?.as_str().parse().ok()?;
    Some(ErrorLine {
        line: number.checked_sub(1)?,
        message: captures.get(2)?.as_str().trim().to_string(),
    })
}

pub struct Diagnostics {
    console: Console,
    editor: Arc<dyn EditorView>,
}

impl Diagnostics {
    pub fn new(console: Console, editor: Arc<dyn EditorView>) -> Self {
        Self { console, editor }
    }

    pub fn on_stdout(&self, text: &str) {
        self.console.log(text);
    }

    /// Logs `text` as an error and marks its line when it names one that
    /// exists in the editor.
    pub fn on_stderr(&self, text: &str) {
        self.console.error(text);

        let Some(error) = parse_error_line(text) else {
            return;
        };
        if error.line < self.editor.line_count() {
            self.editor.mark_error_line(error.line);
        } else {
            tracing::debug!(
                "[Diagnostics] Error on line {} is outside the editor",
                error.line + 1
            );
        }
    }
}
