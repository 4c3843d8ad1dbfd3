//! Manifest resolution engine for Manifest Scout
//!
//! Turns one root `Cargo.toml` in a remote tree into the deduplicated set of
//! manifests needed to understand its dependency graph.
//!
//! # Modules
//!
//! - [`path_deps`] - path dependency candidates of a parsed manifest
//! - [`workspace`] - workspace member expansion, including globs
//! - [`submodule`] - redirects into submodule repositories
//! - [`engine`] - the [`Resolver`] traversal
//! - [`config`] - [`FetchConfig`]
//! - [`file`] - [`DependencyFile`] and the resulting [`FileSet`]

pub mod config;
pub mod engine;
pub mod error;
pub mod file;
pub mod path_deps;
pub mod submodule;
pub mod workspace;

pub use config::{DEFAULT_CONCURRENCY, FetchConfig, MAX_CONCURRENCY, ToolchainPrecedence};
pub use engine::Resolver;
pub use error::{Error, Result};
pub use file::{DependencyFile, EcosystemVersions, FileSet, FileType};
pub use path_deps::{PathCandidate, extract_path_dependencies};
pub use submodule::{
    Located, SubmoduleRedirect, fetch_file, list_dir, locate, resolve_submodule,
};
pub use workspace::expand_members;

/// File name of a package manifest.
pub const MANIFEST: &str = "Cargo.toml";

/// File name of the lockfile next to the root manifest.
pub const LOCKFILE: &str = "Cargo.lock";
