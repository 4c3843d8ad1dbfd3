//! Command implementations

use crate::error::{CliError, Result};
use colored::Colorize;
use scout_core::{FetchConfig, FileSet, Resolver};
use scout_git::GitTree;
use scout_tree::{RepositoryId, TreeContext};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments of `scout resolve`, minus output selection.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub root_repository: String,
    pub reference: String,
    pub config: Option<PathBuf>,
    pub directory: Option<String>,
    pub concurrency: Option<usize>,
    pub repositories: Vec<(String, PathBuf)>,
    pub mirror_root: Option<PathBuf>,
}

impl ResolveRequest {
    /// Config file values with command-line overrides applied.
    fn fetch_config(&self) -> Result<FetchConfig> {
        let mut config = match &self.config {
            Some(path) => FetchConfig::load(path)?,
            None => FetchConfig::default(),
        };
        if let Some(directory) = &self.directory {
            config = config.with_directory(directory.as_str());
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        Ok(config)
    }

    fn tree(&self) -> GitTree {
        let mut tree = GitTree::new();
        for (identity, path) in &self.repositories {
            tree = tree.with_repository(RepositoryId::from_url(identity), path.clone());
        }
        if let Some(root) = &self.mirror_root {
            tree = tree.with_mirror_root(root.clone());
        }
        tree
    }
}

pub fn run_resolve(request: ResolveRequest, json: bool) -> Result<()> {
    let config = request.fetch_config()?;
    let context = TreeContext::new(
        RepositoryId::from_url(&request.root_repository),
        request.reference.clone(),
    );
    let resolver = Resolver::new(Arc::new(request.tree()), context.clone(), config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::user(format!("failed to start runtime: {e}")))?;
    let files = runtime.block_on(resolver.run())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        print!("{}", render(&context, &files));
    }
    Ok(())
}

fn render(context: &TreeContext, files: &FileSet) -> String {
    let mut out = format!(
        "{} {} manifest files for {}\n",
        "Resolved".green().bold(),
        files.len(),
        context.to_string().cyan()
    );
    for file in &files.files {
        if file.support_file {
            out.push_str(&format!("  {} {}\n", file.path(), "(support)".dimmed()));
        } else {
            out.push_str(&format!("  {}\n", file.path()));
        }
    }
    out.push_str(&format!(
        "cargo channel: {}\n",
        files.ecosystem_versions.cargo.bold()
    ));
    out
}
