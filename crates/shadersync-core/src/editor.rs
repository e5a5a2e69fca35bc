//! Editor widget boundary.

/// The code editor the user types into.
///
/// The host forwards the widget's change events to
/// `EditChannel::on_edit`; the engine drives the widget through this trait.
pub trait EditorView: Send + Sync {
    /// Full current text.
    fn value(&self) -> String;

    /// Replaces the full text.
    fn set_value(&self, text: &str);

    fn line_count(&self) -> usize;

    /// Highlights a zero-based line as erroneous.
    fn mark_error_line(&self, line: usize);

    /// Removes every error highlight.
    fn clear_error_lines(&self);
}
