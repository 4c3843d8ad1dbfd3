//! Cargo manifest and toolchain file parsing for Manifest Scout
//!
//! Turns raw `Cargo.toml` text into the handful of fields the resolver
//! follows (path dependencies and workspace tables), and extracts the
//! toolchain channel from `rust-toolchain` / `rust-toolchain.toml`.

pub mod cargo;
pub mod error;
pub mod toolchain;

pub use cargo::{
    DependencyKind, DependencySection, ParsedManifest, PathDependency, Workspace,
    WorkspaceMembers,
};
pub use error::{Error, Result};
pub use toolchain::{DEFAULT_CHANNEL, ToolchainFile, extract_channel};
