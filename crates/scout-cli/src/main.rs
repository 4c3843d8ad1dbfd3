//! Manifest Scout CLI
//!
//! Resolves the Cargo manifests reachable from a repository's root manifest
//! at one commit, reading local git mirrors.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log verbosity (default: `info`; `--verbose` forces `debug`)
//! - `SCOUT_CONFIG`: fetch configuration file
//! - `SCOUT_MIRROR_ROOT`: directory of `<identity>.git` mirrors

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        return Err(CliError::user(format!("failed to initialise logging: {e}")));
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Commands::Resolve {
            root_repository,
            reference,
            config,
            directory,
            concurrency,
            repositories,
            mirror_root,
            json,
        } => {
            let request = commands::ResolveRequest {
                root_repository,
                reference,
                config,
                directory,
                concurrency,
                repositories,
                mirror_root,
            };
            commands::run_resolve(request, json)
        }
    }
}
