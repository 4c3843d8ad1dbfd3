//! CLI end-to-end tests that invoke the compiled `scout` binary against
//! real git databases.

use assert_cmd::Command;
use predicates::prelude::*;
use scout_test_utils::git::GitFixture;
use scout_test_utils::manifests;

const BUMP: &str = "github.com/gocardless/bump";

/// Get a Command for the scout binary
fn scout_cmd() -> Command {
    let mut cmd = Command::cargo_bin("scout").expect("Failed to find scout binary");
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SCOUT_CONFIG")
        .env_remove("SCOUT_MIRROR_ROOT");
    cmd
}

fn repository_flag(fixture: &GitFixture) -> String {
    format!("{}={}", BUMP, fixture.path().display())
}

#[test]
fn test_help_exits_zero() {
    scout_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_resolve_prints_files() {
    let fixture = GitFixture::new();
    let sha = fixture
        .commit()
        .file("Cargo.toml", manifests::PATH_DEP)
        .file("Cargo.lock", manifests::LOCKFILE)
        .file("src/s3/Cargo.toml", manifests::PLAIN)
        .file("rust-toolchain", "nightly-2019-01-01\n")
        .write();

    scout_cmd()
        .args(["resolve", "--reference", &sha, "--repository"])
        .arg(repository_flag(&fixture))
        .arg(BUMP)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 4 manifest files"))
        .stdout(predicate::str::contains("/src/s3/Cargo.toml (support)"))
        .stdout(predicate::str::contains("cargo channel: nightly-2019-01-01"));
}

#[test]
fn test_resolve_json() {
    let fixture = GitFixture::new();
    let sha = fixture
        .commit()
        .file("Cargo.toml", manifests::WORKSPACE_ROOT_GLOB)
        .file("packages/sub_crate/Cargo.toml", manifests::WORKSPACE_CHILD)
        .file("packages/sub_crate2/Cargo.toml", manifests::WORKSPACE_CHILD2)
        .write();

    let output = scout_cmd()
        .args(["resolve", "--json", "--reference", &sha, "--repository"])
        .arg(repository_flag(&fixture))
        .arg(BUMP)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = json["files"].as_array().unwrap();
    let directories: Vec<&str> = files
        .iter()
        .map(|f| f["directory"].as_str().unwrap())
        .collect();
    assert_eq!(
        directories,
        vec!["/", "/packages/sub_crate", "/packages/sub_crate2"]
    );
    assert!(files.iter().all(|f| f["support_file"] == false));
    assert_eq!(json["ecosystem_versions"]["cargo"], "default");
}

#[test]
fn test_resolve_through_submodule() {
    let conduit = GitFixture::new();
    let pinned = conduit
        .commit()
        .file("Cargo.toml", manifests::WORKSPACE_CHILD)
        .write();

    let fixture = GitFixture::new();
    let sha = fixture
        .commit()
        .file("Cargo.toml", manifests::WORKSPACE_ROOT)
        .submodule(
            "lib/sub_crate",
            "https://github.com/runconduit/conduit.git",
            &pinned,
        )
        .write();

    scout_cmd()
        .args(["resolve", "--reference", &sha, "--repository"])
        .arg(repository_flag(&fixture))
        .arg("--repository")
        .arg(format!(
            "github.com/runconduit/conduit={}",
            conduit.path().display()
        ))
        .arg(BUMP)
        .assert()
        .success()
        .stdout(predicate::str::contains("  /lib/sub_crate/Cargo.toml\n"));
}

#[test]
fn test_unreachable_path_dependency_fails() {
    let fixture = GitFixture::new();
    let sha = fixture
        .commit()
        .file("Cargo.toml", manifests::TWO_PATH_DEPS)
        .write();

    scout_cmd()
        .args(["resolve", "--reference", &sha, "--repository"])
        .arg(repository_flag(&fixture))
        .arg(BUMP)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Path dependencies not reachable: src/s3/Cargo.toml, src/dynamo/Cargo.toml",
        ));
}

#[test]
fn test_unknown_repository_reports_missing_root() {
    scout_cmd()
        .args(["resolve", "--reference", "main", BUMP])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/Cargo.toml not found"));
}
