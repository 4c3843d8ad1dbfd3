//! git2-backed remote tree for Manifest Scout
//!
//! [`GitTree`] answers [`scout_tree::RemoteTree`] calls from local git
//! object databases (bare mirrors or clones), reading blobs and trees at the
//! pinned commit of each request. Gitlinks are reported as submodules, with
//! their repository identity taken from `.gitmodules` at the same commit.

pub mod error;
pub mod gitmodules;
pub mod tree;

pub use error::{Error, Result};
pub use gitmodules::Gitmodules;
pub use tree::GitTree;
