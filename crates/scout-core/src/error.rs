//! Error types for scout-core

use scout_tree::RepoPath;

/// Result type for scout-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ways a resolution can fail.
///
/// Every variant except [`Error::PathDependenciesNotReachable`] aborts the
/// traversal as soon as it is seen. Unreachable path dependencies are
/// collected across the whole traversal and reported together.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root manifest or a declared workspace member is missing
    #[error("{path} not found")]
    FileNotFound { path: RepoPath },

    /// A manifest or toolchain file could not be parsed
    #[error("{path} is not parseable: {message}")]
    NotParseable { path: RepoPath, message: String },

    /// Path dependencies without an alternate source that could not be fetched.
    ///
    /// Entries are manifest paths relative to the root directory.
    #[error("Path dependencies not reachable: {}", dependencies.join(", "))]
    PathDependenciesNotReachable { dependencies: Vec<String> },

    /// The remote tree could not answer
    #[error(transparent)]
    Tree(#[from] scout_tree::Error),

    /// A fetch task panicked or was cancelled
    #[error("Resolution worker failed: {message}")]
    Worker { message: String },

    /// Invalid fetch configuration
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn not_parseable(path: RepoPath, error: scout_meta::Error) -> Self {
        let message = match error {
            scout_meta::Error::ManifestParse { message } => message,
            scout_meta::Error::ToolchainParse { message, .. } => message,
        };
        Self::NotParseable { path, message }
    }
}
