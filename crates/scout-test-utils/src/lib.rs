//! Shared test fixtures for the manifest-scout workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`manifests`] — canonical `Cargo.toml` bodies for resolution scenarios
//! - [`tree`] — in-memory remote trees seeded with those manifests
//! - [`git`] — real git object databases, including submodule gitlinks

pub mod git;
pub mod manifests;
pub mod tree;
