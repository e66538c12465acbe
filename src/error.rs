//! Error types for repository inspection.

use std::path::PathBuf;

/// Alias for results returned by the inspector.
pub type Result<T> = std::result::Result<T, InspectError>;

/// Underlying cause carried by an [`InspectError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced while reading a repository.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("Not a git repository: {}", path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: Box<gix::open::Error>,
    },

    #[error("HEAD is detached, no branch is checked out")]
    DetachedHead,

    #[error("Invalid revision range '{expr}'")]
    InvalidRange {
        expr: String,
        #[source]
        source: BoxError,
    },

    #[error("Repository has no commits on the current branch")]
    NoCommits,

    #[error("Range listing starts at {found}, expected {expected}")]
    RangeMismatch { expected: String, found: String },

    #[error("Failed to traverse commit history")]
    Traversal(#[source] BoxError),
}

impl InspectError {
    pub(crate) fn traversal(err: impl Into<BoxError>) -> Self {
        InspectError::Traversal(err.into())
    }

    pub(crate) fn invalid_range(expr: &str, source: impl Into<BoxError>) -> Self {
        InspectError::InvalidRange {
            expr: expr.to_string(),
            source: source.into(),
        }
    }
}
