//! Canonical manifest bodies.
//!
//! Each constant describes one repository shape the resolver has to handle;
//! the names say which directories the manifest points at.

/// A standalone package with registry dependencies only.
pub const PLAIN: &str = r#"[package]
name = "bump"
version = "0.1.0"
authors = ["Gocardless <engineering@gocardless.com>"]

[dependencies]
time = "0.1.12"
regex = "0.1.41"
"#;

pub const LOCKFILE: &str = r#"version = 3

[[package]]
name = "bump"
version = "0.1.0"
"#;

/// Depends on `src/s3` by path.
pub const PATH_DEP: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
regex = "0.1.41"
s3 = { path = "src/s3" }
"#;

/// Depends on `src/s3/` (trailing slash) by path.
pub const PATH_DEP_TRAILING_SLASH: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
s3 = { path = "src/s3/" }
"#;

/// Depends on itself through a blank path.
pub const PATH_DEP_BLANK: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
myself = { path = "" }
"#;

/// Depends on `src/s3` through a target-specific table.
pub const TARGET_PATH_DEP: &str = r#"[package]
name = "bump"
version = "0.1.0"

[target.'cfg(target_os = "linux")'.dependencies]
s3 = { path = "src/s3" }
"#;

/// Replaces a registry package with `src/s3`.
pub const REPLACEMENT_PATH: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
s3 = "0.1.0"

[replace]
"s3:0.1.0" = { path = "src/s3" }
"#;

/// Patches crates.io with `src/s3`.
pub const PATCHED_PATH: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
s3 = "0.1.0"

[patch.crates-io]
s3 = { path = "src/s3" }
"#;

/// Depends on `gen/photoslibrary1` by path, with a git source as well.
pub const PATH_DEP_ALT_SOURCE: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
google-photoslibrary1 = { path = "gen/photoslibrary1", git = "https://github.com/Byron/google-apis-rs" }
"#;

/// Depends on `src/s3` and `src/dynamo` by path, neither with another source.
pub const TWO_PATH_DEPS: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
s3 = { path = "src/s3" }
dynamo = { path = "src/dynamo" }
"#;

/// Workspace root listing `lib/sub_crate` explicitly.
pub const WORKSPACE_ROOT: &str = r#"[package]
name = "bump"
version = "0.1.0"

[workspace]
members = ["lib/sub_crate"]
"#;

/// A workspace member with only registry dependencies.
pub const WORKSPACE_CHILD: &str = r#"[package]
name = "sub_crate"
version = "0.1.0"

[dependencies]
log = "0.4"
"#;

/// Workspace root without `members`; its path dependency `src/s3` is an
/// implicit member.
pub const WORKSPACE_IMPLICIT: &str = r#"[package]
name = "bump"
version = "0.1.0"

[workspace]

[dependencies]
s3 = { path = "src/s3" }
"#;

/// Workspace root whose member `lib/sub_crate` is also a path dependency.
pub const WORKSPACE_AND_PATH_ROOT: &str = r#"[package]
name = "bump"
version = "0.1.0"

[dependencies]
sub_crate = { path = "lib/sub_crate" }

[workspace]
members = ["lib/sub_crate"]
"#;

/// Workspace root matching every directory under `packages/`.
pub const WORKSPACE_ROOT_GLOB: &str = r#"[workspace]
members = ["packages/*"]
"#;

/// Workspace root matching `packages/sub_*` only.
pub const WORKSPACE_ROOT_PARTIAL_GLOB: &str = r#"[workspace]
members = ["packages/sub_*"]
"#;

/// Second glob member; depends on its sibling `../sub_crate` by path.
pub const WORKSPACE_CHILD2: &str = r#"[package]
name = "sub_crate2"
version = "0.1.0"

[dependencies]
sub_crate = { path = "../sub_crate" }
"#;

/// Workspace root with member `member` and excluded directory `excluded`.
pub const EXCLUDED_ROOT: &str = r#"[workspace]
members = ["member", "excluded"]
exclude = ["excluded"]
"#;

/// Member that depends on the excluded directory by path.
pub const EXCLUDED_MEMBER: &str = r#"[package]
name = "member"
version = "0.1.0"

[dependencies]
excluded = { path = "../excluded" }
"#;

pub const EXCLUDED_PACKAGE: &str = r#"[package]
name = "excluded"
version = "0.1.0"
"#;

/// Package at `a` depending on `../b`, for cycle scenarios.
pub const CYCLE_A: &str = r#"[package]
name = "a"
version = "0.1.0"

[dependencies]
b = { path = "../b" }
"#;

/// Package at `b` depending back on `../a`.
pub const CYCLE_B: &str = r#"[package]
name = "b"
version = "0.1.0"

[dependencies]
a = { path = "../a" }
"#;

pub const UNPARSEABLE: &str = r#"[package]
name = "bump"
version = 0.1.0
"#;
