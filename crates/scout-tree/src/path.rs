//! Slash-rooted path handling for repository trees

use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute path inside a repository tree.
///
/// The internal representation always starts with `/`, never carries a
/// trailing slash (except the root itself) and contains no empty, `.` or
/// `..` segments. A `..` that would climb above the root stays at the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RepoPath {
    inner: String,
}

impl RepoPath {
    /// The repository root, `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    /// Create a path from any slash- or backslash-separated string.
    ///
    /// A missing leading slash is added; the result is always cleaned.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            inner: clean("", path.as_ref()),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The path without its leading slash (`""` for the root).
    ///
    /// This is the form git tree lookups and hosting APIs expect.
    pub fn as_relative(&self) -> &str {
        &self.inner[1..]
    }

    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Join a relative segment (which may itself contain `/`, `.` or `..`).
    pub fn join(&self, segment: &str) -> Self {
        Self {
            inner: clean(&self.inner, segment),
        }
    }

    /// Get the parent directory, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the last path component, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.inner.rsplit('/').next()
        }
    }

    /// Iterate over the path components.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.as_relative().split('/').filter(|s| !s.is_empty())
    }

    /// Whether `self` is `base` or lies underneath it.
    pub fn starts_with(&self, base: &RepoPath) -> bool {
        base.is_root()
            || self.inner == base.inner
            || (self.inner.starts_with(&base.inner)
                && self.inner.as_bytes().get(base.inner.len()) == Some(&b'/'))
    }

    /// Express this path relative to `base`, climbing with `..` if needed.
    ///
    /// Returns `"."` when both paths are equal.
    pub fn relative_to(&self, base: &RepoPath) -> String {
        let ours: Vec<&str> = self.segments().collect();
        let theirs: Vec<&str> = base.segments().collect();
        let common = ours
            .iter()
            .zip(theirs.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = std::iter::repeat_n("..", theirs.len() - common).collect();
        parts.extend(&ours[common..]);

        if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        }
    }
}

fn clean(base: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

impl Default for RepoPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for RepoPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RepoPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(p: RepoPath) -> Self {
        p.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "/")]
    #[case("/", "/")]
    #[case("src/s3", "/src/s3")]
    #[case("/src/s3/", "/src/s3")]
    #[case("my_dir//nested/", "/my_dir/nested")]
    #[case("a/./b/../c", "/a/c")]
    #[case("../../escape", "/escape")]
    #[case("win\\style\\path", "/win/style/path")]
    fn test_new_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(RepoPath::new(input).as_str(), expected);
    }

    #[rstest]
    #[case("/", "src/s3", "/src/s3")]
    #[case("/src/s3", "", "/src/s3")]
    #[case("/src/s3", ".", "/src/s3")]
    #[case("/src/s3", "src/s3/", "/src/s3/src/s3")]
    #[case("/member", "../excluded", "/excluded")]
    #[case("/a/b", "../../..", "/")]
    fn test_join(#[case] base: &str, #[case] segment: &str, #[case] expected: &str) {
        assert_eq!(RepoPath::new(base).join(segment).as_str(), expected);
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = RepoPath::new("/lib/sub_crate");
        assert_eq!(path.file_name(), Some("sub_crate"));
        assert_eq!(path.parent(), Some(RepoPath::new("/lib")));
        assert_eq!(RepoPath::new("/lib").parent(), Some(RepoPath::root()));
        assert_eq!(RepoPath::root().parent(), None);
        assert_eq!(RepoPath::root().file_name(), None);
    }

    #[test]
    fn test_starts_with_respects_segments() {
        let base = RepoPath::new("/packages");
        assert!(RepoPath::new("/packages/a").starts_with(&base));
        assert!(RepoPath::new("/packages").starts_with(&base));
        assert!(!RepoPath::new("/packages2/a").starts_with(&base));
        assert!(RepoPath::new("/anything").starts_with(&RepoPath::root()));
    }

    #[rstest]
    #[case("/src/s3/Cargo.toml", "/", "src/s3/Cargo.toml")]
    #[case("/my_dir/src/s3/Cargo.toml", "/my_dir", "src/s3/Cargo.toml")]
    #[case("/other/Cargo.toml", "/my_dir", "../other/Cargo.toml")]
    #[case("/my_dir", "/my_dir", ".")]
    fn test_relative_to(#[case] path: &str, #[case] base: &str, #[case] expected: &str) {
        assert_eq!(RepoPath::new(path).relative_to(&RepoPath::new(base)), expected);
    }

    #[test]
    fn test_as_relative() {
        assert_eq!(RepoPath::root().as_relative(), "");
        assert_eq!(RepoPath::new("/a/b").as_relative(), "a/b");
    }
}
