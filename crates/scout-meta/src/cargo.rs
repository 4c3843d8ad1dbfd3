//! `Cargo.toml` parsing
//!
//! Only the parts of a manifest that point at other manifests are kept:
//! dependency entries carrying a `path`, and the `[workspace]` table.

use crate::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::fmt;

/// Which flavour of dependency table an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Normal,
    Dev,
    Build,
}

impl DependencyKind {
    pub fn table_name(self) -> &'static str {
        match self {
            DependencyKind::Normal => "dependencies",
            DependencyKind::Dev => "dev-dependencies",
            DependencyKind::Build => "build-dependencies",
        }
    }
}

/// The manifest table a path dependency was declared in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencySection {
    /// `[dependencies]` and friends, optionally under `[target.'cfg(..)']`
    Dependencies {
        kind: DependencyKind,
        target: Option<String>,
    },
    /// `[workspace.dependencies]`
    Workspace,
    /// `[replace]`
    Replace,
    /// `[patch.<source>]`
    Patch { source: String },
}

impl fmt::Display for DependencySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencySection::Dependencies { kind, target: None } => {
                f.write_str(kind.table_name())
            }
            DependencySection::Dependencies {
                kind,
                target: Some(target),
            } => write!(f, "target.{}.{}", target, kind.table_name()),
            DependencySection::Workspace => f.write_str("workspace.dependencies"),
            DependencySection::Replace => f.write_str("replace"),
            DependencySection::Patch { source } => write!(f, "patch.{}", source),
        }
    }
}

/// A dependency entry that carries a `path` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathDependency {
    /// Key of the entry in its table
    pub name: String,
    /// The raw `path` value, relative to the declaring manifest's directory
    pub path: String,
    pub section: DependencySection,
    /// The entry also names a `git` or `registry` source
    pub has_alternate_source: bool,
}

/// Workspace membership declared by a `[workspace]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceMembers {
    /// No `members` key: the package is its own sole member.
    Implicit,
    /// Literal relative paths and glob patterns, in declaration order.
    Explicit(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub members: WorkspaceMembers,
    pub exclude: Vec<String>,
}

/// Structured view of one `Cargo.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedManifest {
    pub package_name: Option<String>,
    /// Path dependencies in scan order: dependency tables, target tables,
    /// `workspace.dependencies`, `replace`, then each `patch` table.
    pub path_dependencies: Vec<PathDependency>,
    pub workspace: Option<Workspace>,
}

impl ParsedManifest {
    /// Parse manifest text.
    ///
    /// # Example
    ///
    /// ```
    /// use scout_meta::ParsedManifest;
    ///
    /// let manifest = ParsedManifest::parse(r#"
    /// [package]
    /// name = "bump"
    ///
    /// [dependencies]
    /// s3 = { path = "src/s3" }
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.path_dependencies[0].path, "src/s3");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)?;
        Ok(raw.into_parsed())
    }

    pub fn is_workspace(&self) -> bool {
        self.workspace.is_some()
    }
}

type DependencyMap = IndexMap<String, RawDependency>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDependency {
    Detailed(DetailedDependency),
    /// Bare version strings and anything else without a `path`
    Other(IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
struct DetailedDependency {
    path: Option<String>,
    git: Option<String>,
    registry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawDependencyTables {
    #[serde(default)]
    dependencies: DependencyMap,
    #[serde(default)]
    dev_dependencies: DependencyMap,
    #[serde(default)]
    build_dependencies: DependencyMap,
}

#[derive(Debug, Default, Deserialize)]
struct RawWorkspace {
    members: Option<Vec<String>>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    dependencies: DependencyMap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawManifest {
    package: Option<RawPackage>,
    #[serde(default)]
    dependencies: DependencyMap,
    #[serde(default)]
    dev_dependencies: DependencyMap,
    #[serde(default)]
    build_dependencies: DependencyMap,
    #[serde(default)]
    target: IndexMap<String, RawDependencyTables>,
    workspace: Option<RawWorkspace>,
    #[serde(default)]
    replace: DependencyMap,
    #[serde(default)]
    patch: IndexMap<String, DependencyMap>,
}

impl RawManifest {
    fn into_parsed(self) -> ParsedManifest {
        let mut path_dependencies = Vec::new();

        let top_level = RawDependencyTables {
            dependencies: self.dependencies,
            dev_dependencies: self.dev_dependencies,
            build_dependencies: self.build_dependencies,
        };
        collect_tables(&mut path_dependencies, &top_level, None);
        for (target, tables) in &self.target {
            collect_tables(&mut path_dependencies, tables, Some(target));
        }

        let workspace = self.workspace.map(|ws| {
            collect(
                &mut path_dependencies,
                &ws.dependencies,
                DependencySection::Workspace,
            );
            Workspace {
                members: match ws.members {
                    Some(members) => WorkspaceMembers::Explicit(members),
                    None => WorkspaceMembers::Implicit,
                },
                exclude: ws.exclude,
            }
        });

        collect(
            &mut path_dependencies,
            &self.replace,
            DependencySection::Replace,
        );
        for (source, table) in &self.patch {
            collect(
                &mut path_dependencies,
                table,
                DependencySection::Patch {
                    source: source.clone(),
                },
            );
        }

        ParsedManifest {
            package_name: self.package.and_then(|p| p.name),
            path_dependencies,
            workspace,
        }
    }
}

fn collect_tables(out: &mut Vec<PathDependency>, tables: &RawDependencyTables, target: Option<&str>) {
    let sections = [
        (DependencyKind::Normal, &tables.dependencies),
        (DependencyKind::Dev, &tables.dev_dependencies),
        (DependencyKind::Build, &tables.build_dependencies),
    ];
    for (kind, table) in sections {
        collect(
            out,
            table,
            DependencySection::Dependencies {
                kind,
                target: target.map(str::to_string),
            },
        );
    }
}

fn collect(out: &mut Vec<PathDependency>, table: &DependencyMap, section: DependencySection) {
    for (name, dependency) in table {
        let RawDependency::Detailed(detail) = dependency else {
            continue;
        };
        let Some(path) = &detail.path else {
            continue;
        };
        out.push(PathDependency {
            name: name.clone(),
            path: path.clone(),
            section: section.clone(),
            has_alternate_source: detail.git.is_some() || detail.registry.is_some(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_package() {
        let manifest = ParsedManifest::parse(
            r#"
[package]
name = "bump"
version = "0.1.0"

[dependencies]
time = "0.1.12"
regex = { version = "0.1.41" }
"#,
        )
        .unwrap();

        assert_eq!(manifest.package_name.as_deref(), Some("bump"));
        assert!(manifest.path_dependencies.is_empty());
        assert!(!manifest.is_workspace());
    }

    #[test]
    fn test_alternate_source_flag() {
        let manifest = ParsedManifest::parse(
            r#"
[dependencies]
photoslibrary1 = { path = "gen/photoslibrary1", git = "https://github.com/Byron/google-apis-rs" }
local = { path = "local", version = "1.0" }
"#,
        )
        .unwrap();

        let flags: Vec<(&str, bool)> = manifest
            .path_dependencies
            .iter()
            .map(|d| (d.name.as_str(), d.has_alternate_source))
            .collect();
        assert_eq!(flags, vec![("photoslibrary1", true), ("local", false)]);
    }

    #[test]
    fn test_scan_order_across_sections() {
        let manifest = ParsedManifest::parse(
            r#"
[package]
name = "ordered"

[patch.crates-io]
patched = { path = "patched" }

[replace]
"replaced:0.1.0" = { path = "replaced" }

[target.'cfg(unix)'.dependencies]
unix_only = { path = "unix" }

[build-dependencies]
builder = { path = "builder" }

[dependencies]
normal = { path = "normal" }
"#,
        )
        .unwrap();

        let sections: Vec<String> = manifest
            .path_dependencies
            .iter()
            .map(|d| format!("{}:{}", d.section, d.path))
            .collect();
        assert_eq!(
            sections,
            vec![
                "dependencies:normal",
                "build-dependencies:builder",
                "target.cfg(unix).dependencies:unix",
                "replace:replaced",
                "patch.crates-io:patched",
            ]
        );
    }

    #[test]
    fn test_workspace_tables() {
        let manifest = ParsedManifest::parse(
            r#"
[workspace]
members = ["lib/sub_crate", "packages/*"]
exclude = ["packages/legacy"]

[workspace.dependencies]
shared = { path = "shared" }
"#,
        )
        .unwrap();

        let workspace = manifest.workspace.unwrap();
        assert_eq!(
            workspace.members,
            WorkspaceMembers::Explicit(vec!["lib/sub_crate".into(), "packages/*".into()])
        );
        assert_eq!(workspace.exclude, vec!["packages/legacy".to_string()]);
        assert_eq!(manifest.path_dependencies[0].section, DependencySection::Workspace);
    }

    #[test]
    fn test_workspace_without_members_is_implicit() {
        let manifest = ParsedManifest::parse(
            r#"
[package]
name = "root"

[workspace]

[dependencies]
s3 = { path = "src/s3" }
"#,
        )
        .unwrap();
        assert_eq!(
            manifest.workspace.unwrap().members,
            WorkspaceMembers::Implicit
        );
    }

    #[test]
    fn test_unparseable_manifest() {
        let err = ParsedManifest::parse("[package]\nname = \"bump\"\nversion = 0.1.0\n").unwrap_err();
        assert!(matches!(err, crate::Error::ManifestParse { .. }));
    }

    #[test]
    fn test_odd_dependency_values_are_ignored() {
        let manifest = ParsedManifest::parse(
            r#"
[dependencies]
weird = 3
inherited = { workspace = true }
"#,
        )
        .unwrap();
        assert!(manifest.path_dependencies.is_empty());
    }

    #[test]
    fn test_bare_versions_beside_path_dependencies() {
        let manifest = ParsedManifest::parse(
            r#"
[dependencies]
time = "0.1.12"
features = ["a", "b"]
s3 = { path = "src/s3" }
serde = "1"
"#,
        )
        .unwrap();
        let names: Vec<&str> = manifest
            .path_dependencies
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["s3"]);
    }
}
