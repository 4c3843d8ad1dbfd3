//! Error types for scout-meta

/// Result type for scout-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing manifest or toolchain content
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse manifest: {message}")]
    ManifestParse { message: String },

    #[error("Failed to parse {file}: {message}")]
    ToolchainParse { file: &'static str, message: String },
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ManifestParse {
            message: e.message().to_string(),
        }
    }
}
