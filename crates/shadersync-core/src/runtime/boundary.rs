use crate::error::Result;

/// The narrow surface the sandboxed runtime exposes.
///
/// Implementations wrap the host's FFI. Every method is synchronous; the
/// runtime is single-threaded and never blocks on these calls.
pub trait RuntimeBoundary: Send + Sync {
    /// Whether the runtime script has been instantiated.
    fn is_script_ready(&self) -> bool;

    /// Whether the virtual file system can be written to.
    fn is_fs_ready(&self) -> bool;

    /// Writes `bytes` to `path` in the runtime's virtual file system.
    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Calls an exported runtime function with string arguments.
    ///
    /// Returns `Ok(None)` for void functions.
    fn call(&self, function: &str, args: &[&str]) -> Result<Option<String>>;
}

/// Host-side fullscreen state. Fullscreen commands never reach the runtime.
pub trait FullscreenControl: Send + Sync {
    fn is_fullscreen(&self) -> bool;
    fn set_fullscreen(&self, on: bool);
}
