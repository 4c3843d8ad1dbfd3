//! Remote source tree abstraction for Manifest Scout
//!
//! Everything the resolver knows about a repository comes through the
//! [`RemoteTree`] trait: single-file fetches and directory listings, both
//! addressed at an explicit [`TreeContext`] (repository plus pinned reference).

pub mod context;
pub mod entry;
pub mod error;
pub mod memory;
pub mod path;
pub mod tree;

pub use context::{RepositoryId, TreeContext};
pub use entry::{DirectoryEntry, EntryKind};
pub use error::{Error, Result};
pub use memory::{InMemoryTree, Request};
pub use path::RepoPath;
pub use tree::RemoteTree;
