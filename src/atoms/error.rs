// ── Readtrack Atoms: Error Types ──────────────────────────────────────────
// Single canonical error enum for the tracker, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, DB, Config…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • No error here is fatal to the hosting process: the handler layer catches,
//     logs, and degrades — see engine/handler.rs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLite / rusqlite database failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Tracker configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    /// Prefer adding a specific variant over using this in new code.
    #[error("{0}")]
    Other(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

// ── Migration bridge: String → TrackerError ───────────────────────────────
// Allows `"…".into()` and `?` on call sites that build ad-hoc messages.

impl From<String> for TrackerError {
    fn from(s: String) -> Self {
        TrackerError::Other(s)
    }
}

impl From<&str> for TrackerError {
    fn from(s: &str) -> Self {
        TrackerError::Other(s.to_string())
    }
}
