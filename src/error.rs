//! Domain error taxonomy

use thiserror::Error;

/// Errors surfaced by the content, engagement, and guestbook layers.
///
/// Per-item failures (one malformed file, one slug's missing counter) are
/// contained by their callers and replaced with safe defaults; only
/// validation and not-found conditions are meant to reach the user.
#[derive(Error, Debug)]
pub enum Error {
    /// A source file's metadata block cannot be located or parsed.
    /// The file is skipped and the batch continues.
    #[error("malformed content in {path}: {reason}")]
    MalformedContent { path: String, reason: String },

    /// The document store cannot be reached. Engagement figures degrade
    /// to zero, content listing still succeeds.
    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),

    /// A requested slug or id does not exist in any origin.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller-supplied payload failed required-field or length checks.
    #[error("{0}")]
    Validation(String),

    /// An operation is intentionally disabled in this deployment
    /// environment, distinct from a generic failure.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
