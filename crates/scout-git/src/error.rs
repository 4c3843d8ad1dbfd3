//! Error types for scout-git

/// Result type for scout-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scout-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Blocking git task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}
