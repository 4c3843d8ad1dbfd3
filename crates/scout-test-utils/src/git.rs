//! Real git object databases for tree tests.
//!
//! Commits are written straight into a bare repository through `git2`, so a
//! fixture can contain gitlinks (submodules) without cloning anything.

use git2::{Index, IndexEntry, IndexTime, Oid, Repository, Signature};
use std::path::Path;
use tempfile::TempDir;

const FILE_MODE: u32 = 0o100644;
const GITLINK_MODE: u32 = 0o160000;

/// A bare repository in a temporary directory.
///
/// # Panics
/// Every method panics if the underlying git operation fails.
pub struct GitFixture {
    dir: TempDir,
    repo: Repository,
}

impl Default for GitFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl GitFixture {
    /// Initialise an empty bare repository.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap_or_else(|e| panic!("GitFixture: tempdir failed: {e}"));
        let repo = Repository::init_bare(dir.path()).unwrap_or_else(|e| {
            panic!(
                "GitFixture: failed to init bare repository at {}: {e}",
                dir.path().display()
            )
        });
        // Gitlinks point at commits that live in other repositories.
        git2::opts::strict_object_creation(false);
        Self { dir, repo }
    }

    /// Path of the git directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Start describing the tree of a new root commit.
    pub fn commit(&self) -> CommitBuilder<'_> {
        CommitBuilder {
            fixture: self,
            files: Vec::new(),
            submodules: Vec::new(),
        }
    }
}

/// Collects files and gitlinks, then writes them as one commit.
pub struct CommitBuilder<'a> {
    fixture: &'a GitFixture,
    files: Vec<(String, String)>,
    submodules: Vec<(String, String, String)>,
}

impl CommitBuilder<'_> {
    /// Add a regular file at `path` (no leading slash).
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }

    /// Add a gitlink at `path` pinned to `commit`, declared in `.gitmodules`
    /// with clone URL `url`.
    pub fn submodule(mut self, path: &str, url: &str, commit: &str) -> Self {
        self.submodules
            .push((path.to_string(), url.to_string(), commit.to_string()));
        self
    }

    /// Write the commit and return its full hex id.
    pub fn write(self) -> String {
        let repo = &self.fixture.repo;
        let mut index = Index::new().unwrap_or_else(|e| panic!("CommitBuilder: index: {e}"));

        let mut files = self.files;
        if !self.submodules.is_empty() {
            let gitmodules: String = self
                .submodules
                .iter()
                .map(|(path, url, _)| {
                    format!("[submodule \"{path}\"]\n\tpath = {path}\n\turl = {url}\n")
                })
                .collect();
            files.push((".gitmodules".to_string(), gitmodules));
        }

        for (path, content) in &files {
            let oid = repo
                .blob(content.as_bytes())
                .unwrap_or_else(|e| panic!("CommitBuilder: blob {path}: {e}"));
            add(&mut index, path, FILE_MODE, oid, content.len());
        }
        for (path, _, commit) in &self.submodules {
            let oid = Oid::from_str(commit)
                .unwrap_or_else(|e| panic!("CommitBuilder: bad commit id {commit}: {e}"));
            add(&mut index, path, GITLINK_MODE, oid, 0);
        }

        let tree_id = index
            .write_tree_to(repo)
            .unwrap_or_else(|e| panic!("CommitBuilder: write tree: {e}"));
        let tree = repo
            .find_tree(tree_id)
            .unwrap_or_else(|e| panic!("CommitBuilder: find tree: {e}"));
        let signature = Signature::now("Test User", "test@test.com")
            .unwrap_or_else(|e| panic!("CommitBuilder: signature: {e}"));
        repo.commit(None, &signature, &signature, "fixture", &tree, &[])
            .unwrap_or_else(|e| panic!("CommitBuilder: commit: {e}"))
            .to_string()
    }
}

fn add(index: &mut Index, path: &str, mode: u32, id: Oid, size: usize) {
    let entry = IndexEntry {
        ctime: IndexTime::new(0, 0),
        mtime: IndexTime::new(0, 0),
        dev: 0,
        ino: 0,
        mode,
        uid: 0,
        gid: 0,
        file_size: size as u32,
        id,
        flags: path.len().min(0xfff) as u16,
        flags_extended: 0,
        path: path.as_bytes().to_vec(),
    };
    index
        .add(&entry)
        .unwrap_or_else(|e| panic!("CommitBuilder: index add {path}: {e}"));
}
