//! Toolchain channel extraction

use crate::{Error, Result};
use serde::Deserialize;

/// Channel reported when a repository pins no toolchain.
pub const DEFAULT_CHANNEL: &str = "default";

/// The two toolchain file flavours rustup understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolchainFile {
    /// `rust-toolchain`: a bare channel token
    Legacy,
    /// `rust-toolchain.toml`: a `[toolchain]` table
    Toml,
}

impl ToolchainFile {
    pub const fn file_name(self) -> &'static str {
        match self {
            ToolchainFile::Legacy => "rust-toolchain",
            ToolchainFile::Toml => "rust-toolchain.toml",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        match name {
            "rust-toolchain" => Some(ToolchainFile::Legacy),
            "rust-toolchain.toml" => Some(ToolchainFile::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawToolchainFile {
    toolchain: Option<RawToolchain>,
}

#[derive(Debug, Deserialize)]
struct RawToolchain {
    channel: Option<String>,
}

/// Extract the channel string from toolchain file content.
pub fn extract_channel(kind: ToolchainFile, content: &str) -> Result<String> {
    let fail = |message: &str| Error::ToolchainParse {
        file: kind.file_name(),
        message: message.to_string(),
    };

    match kind {
        ToolchainFile::Legacy => {
            let line = content
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .ok_or_else(|| fail("file is empty"))?;

            if line.starts_with('[') || line.contains('=') {
                return Err(fail("expected a bare channel name, found structured content"));
            }
            if line.contains(char::is_whitespace) {
                return Err(fail("channel name contains whitespace"));
            }
            Ok(line.to_string())
        }
        ToolchainFile::Toml => {
            let raw: RawToolchainFile =
                toml::from_str(content).map_err(|e| fail(e.message()))?;
            raw.toolchain
                .and_then(|t| t.channel)
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| fail("missing `toolchain.channel`"))
        }
    }
}
