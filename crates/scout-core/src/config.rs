//! Fetch configuration
//!
//! All keys are optional; an empty file yields [`FetchConfig::default`].
//!
//! ```toml
//! directory = "/"
//! concurrency = 4
//! toolchain_precedence = "toml-first"
//! lockfile = true
//! cargo_config = true
//! ```

use crate::{Error, Result};
use scout_meta::ToolchainFile;
use scout_tree::RepoPath;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fetch jobs in flight when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Upper bound applied to any configured concurrency.
pub const MAX_CONCURRENCY: usize = 32;

/// Which toolchain file wins when a repository carries both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolchainPrecedence {
    /// `rust-toolchain.toml`, then `rust-toolchain`
    #[default]
    TomlFirst,
    /// `rust-toolchain`, then `rust-toolchain.toml`
    LegacyFirst,
}

impl ToolchainPrecedence {
    /// Toolchain files in the order they are probed.
    pub fn order(self) -> [ToolchainFile; 2] {
        match self {
            ToolchainPrecedence::TomlFirst => [ToolchainFile::Toml, ToolchainFile::Legacy],
            ToolchainPrecedence::LegacyFirst => [ToolchainFile::Legacy, ToolchainFile::Toml],
        }
    }
}

/// Settings for one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory of the root manifest inside the repository
    pub directory: RepoPath,

    /// Maximum number of manifest fetches in flight
    pub concurrency: usize,

    pub toolchain_precedence: ToolchainPrecedence,

    /// Collect `Cargo.lock` next to the root manifest
    pub lockfile: bool,

    /// Collect `.cargo/config.toml` (or legacy `.cargo/config`)
    pub cargo_config: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            directory: RepoPath::root(),
            concurrency: DEFAULT_CONCURRENCY,
            toolchain_precedence: ToolchainPrecedence::default(),
            lockfile: true,
            cargo_config: true,
        }
    }
}

impl FetchConfig {
    /// Parse configuration from TOML content.
    ///
    /// # Example
    ///
    /// ```
    /// use scout_core::{FetchConfig, ToolchainPrecedence};
    ///
    /// let config = FetchConfig::parse(r#"
    /// directory = "my_dir/"
    /// toolchain_precedence = "legacy-first"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.directory.as_str(), "/my_dir");
    /// assert_eq!(config.toolchain_precedence, ToolchainPrecedence::LegacyFirst);
    /// assert_eq!(config.concurrency, 4);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: FetchConfig = toml::from_str(content).map_err(|e| Error::Config {
            message: e.message().to_string(),
        })?;
        Ok(config.validated())
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Clamp values into their supported ranges.
    pub fn validated(mut self) -> Self {
        let clamped = self.concurrency.clamp(1, MAX_CONCURRENCY);
        if clamped != self.concurrency {
            tracing::warn!(
                requested = self.concurrency,
                using = clamped,
                "Concurrency out of range"
            );
            self.concurrency = clamped;
        }
        self
    }

    pub fn with_directory(mut self, directory: impl Into<RepoPath>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self.validated()
    }
}
