//! `.gitmodules` parsing
//!
//! Only `path` and `url` are read; everything else in the file is ignored.

use scout_tree::RepoPath;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    name: String,
    path: Option<RepoPath>,
    url: Option<String>,
}

/// Submodule declarations from a `.gitmodules` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gitmodules {
    declarations: Vec<Declaration>,
}

impl Gitmodules {
    pub fn parse(content: &str) -> Self {
        let mut declarations: Vec<Declaration> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = header
                    .trim()
                    .strip_prefix("submodule")
                    .map(|rest| unquote(rest.trim()))
                    .unwrap_or_default();
                declarations.push(Declaration {
                    name: name.to_string(),
                    path: None,
                    url: None,
                });
                continue;
            }

            let (Some(current), Some((key, value))) = (declarations.last_mut(), line.split_once('='))
            else {
                continue;
            };
            let value = unquote(value.trim());
            match key.trim().to_ascii_lowercase().as_str() {
                "path" => current.path = Some(RepoPath::new(value)),
                "url" => current.url = Some(value.to_string()),
                _ => {}
            }
        }

        Self { declarations }
    }

    /// The clone URL declared for the submodule mounted at `path`.
    pub fn url_for(&self, path: &RepoPath) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.path.as_ref() == Some(path))
            .and_then(|d| d.url.as_deref())
    }

    /// Submodule names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GITMODULES: &str = r#"
# managed by hand
[submodule "lib/sub_crate"]
	path = lib/sub_crate
	url = https://github.com/runconduit/conduit.git
[submodule "vendored"]
	path = "third_party/vendored"
	URL = ../vendored.git
	branch = main
"#;

    #[test]
    fn test_parse_declarations() {
        let modules = Gitmodules::parse(GITMODULES);
        assert_eq!(modules.names().collect::<Vec<_>>(), vec!["lib/sub_crate", "vendored"]);
        assert_eq!(
            modules.url_for(&RepoPath::new("lib/sub_crate")),
            Some("https://github.com/runconduit/conduit.git")
        );
        assert_eq!(
            modules.url_for(&RepoPath::new("/third_party/vendored")),
            Some("../vendored.git")
        );
    }

    #[test]
    fn test_unknown_path() {
        let modules = Gitmodules::parse(GITMODULES);
        assert_eq!(modules.url_for(&RepoPath::new("lib")), None);
        assert_eq!(Gitmodules::parse("").url_for(&RepoPath::new("lib")), None);
    }
}
