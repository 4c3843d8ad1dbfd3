//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manifest Scout - find every Cargo manifest a repository needs
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve the manifests reachable from a repository's root Cargo.toml
    ///
    /// Examples:
    ///   scout resolve --repository github.com/org/app=/srv/mirrors/app.git \
    ///       --reference 453df4e github.com/org/app
    ///   scout resolve --mirror-root /srv/mirrors --reference main \
    ///       --directory crates/app --json github.com/org/app
    Resolve {
        /// Repository identity or clone URL of the root repository
        root_repository: String,

        /// Commit, tag or branch to read
        #[arg(short, long)]
        reference: String,

        /// Fetch configuration file (TOML)
        #[arg(short, long, env = "SCOUT_CONFIG")]
        config: Option<PathBuf>,

        /// Directory of the root manifest, overriding the config file
        #[arg(short, long)]
        directory: Option<String>,

        /// Manifest fetches in flight, overriding the config file
        #[arg(long)]
        concurrency: Option<usize>,

        /// Local git database for a repository, as IDENTITY=PATH
        #[arg(long = "repository", value_name = "IDENTITY=PATH", value_parser = parse_repository)]
        repositories: Vec<(String, PathBuf)>,

        /// Directory holding mirrors laid out as <identity>.git
        #[arg(long, env = "SCOUT_MIRROR_ROOT")]
        mirror_root: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

fn parse_repository(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((identity, path)) if !identity.is_empty() && !path.is_empty() => {
            Ok((identity.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected IDENTITY=PATH, got {value:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_resolve_minimal() {
        let cli = Cli::parse_from([
            "scout",
            "resolve",
            "--reference",
            "sha",
            "github.com/gocardless/bump",
        ]);
        assert!(!cli.verbose);
        let Commands::Resolve {
            root_repository,
            reference,
            directory,
            repositories,
            json,
            ..
        } = cli.command;
        assert_eq!(root_repository, "github.com/gocardless/bump");
        assert_eq!(reference, "sha");
        assert!(directory.is_none());
        assert!(repositories.is_empty());
        assert!(!json);
    }

    #[test]
    fn parse_resolve_full() {
        let cli = Cli::parse_from([
            "scout",
            "-v",
            "resolve",
            "-r",
            "main",
            "--directory",
            "my_dir",
            "--concurrency",
            "8",
            "--repository",
            "github.com/gocardless/bump=/tmp/bump.git",
            "--repository",
            "github.com/runconduit/conduit=/tmp/conduit.git",
            "--json",
            "github.com/gocardless/bump",
        ]);
        assert!(cli.verbose);
        let Commands::Resolve {
            directory,
            concurrency,
            repositories,
            json,
            ..
        } = cli.command;
        assert_eq!(directory.as_deref(), Some("my_dir"));
        assert_eq!(concurrency, Some(8));
        assert_eq!(repositories.len(), 2);
        assert_eq!(repositories[1].1, PathBuf::from("/tmp/conduit.git"));
        assert!(json);
    }

    #[test]
    fn parse_repository_rejects_missing_path() {
        assert!(parse_repository("github.com/gocardless/bump").is_err());
        assert!(parse_repository("=/tmp/bump.git").is_err());
        assert_eq!(
            parse_repository("a=b=c").unwrap(),
            ("a".to_string(), PathBuf::from("b=c"))
        );
    }

    #[test]
    fn resolve_requires_reference() {
        let result = Cli::try_parse_from(["scout", "resolve", "github.com/gocardless/bump"]);
        assert!(result.is_err());
    }
}
