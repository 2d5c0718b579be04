// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const PROJECT: &str = "name = \"P\"\nversion = \"1.2.4-DEV\"\n\n[compat]\njulia = \"1.6\"\n";
const README: &str = "[![Commits](https://img.shields.io/github/commits-since/U/P.jl/v1.2.3.svg)](https://github.com/U/P.jl)\n";

fn pkg_release(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("empty-config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_pkg-release"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute pkg-release")
}

/// A git repository holding a package with a badge-carrying README
fn package_repo() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();
    repo.remote("origin", "git@github.com:U/P.jl.git").unwrap();
    fs::write(dir.path().join("Project.toml"), PROJECT).unwrap();
    fs::write(dir.path().join("README.md"), README).unwrap();
    dir
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = pkg_release(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("pkg-release"));
    assert!(stdout.contains("bump-version"));
    assert!(stdout.contains("start-release"));
    assert!(stdout.contains("finish-release"));
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = pkg_release(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bump_version_writes_manifest() {
    let dir = package_repo();
    let output = pkg_release(dir.path(), &["bump-version", "--release"]);

    assert!(output.status.success(), "{:?}", output);
    let manifest = fs::read_to_string(dir.path().join("Project.toml")).unwrap();
    assert!(manifest.contains("version = \"1.2.4\""));
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.contains("P.jl/v1.2.4.svg"));
}

#[test]
fn test_bump_version_dry_run() {
    let dir = package_repo();
    let output = pkg_release(dir.path(), &["bump-version", "2.0.0", "--commit", "--dry-run"]);

    assert!(output.status.success(), "{:?}", output);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[dry-run] Would run: git add -- Project.toml README.md"));
    assert_eq!(
        fs::read_to_string(dir.path().join("Project.toml")).unwrap(),
        PROJECT
    );
    assert_eq!(fs::read_to_string(dir.path().join("README.md")).unwrap(), README);
}

#[test]
fn test_bump_version_rejects_downgrade() {
    let dir = package_repo();
    let output = pkg_release(dir.path(), &["bump-version", "1.0.0"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        fs::read_to_string(dir.path().join("Project.toml")).unwrap(),
        PROJECT
    );
}

#[test]
fn test_start_release_dry_run() {
    let dir = package_repo();
    let output = pkg_release(dir.path(), &["start-release", "--dry-run"]);

    assert!(output.status.success(), "{:?}", output);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[dry-run] Would run: git checkout -b release"));
    assert!(stderr.contains("[dry-run] Would run: git push -u origin release"));
    assert!(stderr.contains(
        "[dry-run] Would open https://github.com/U/P.jl/issues/new?title=Register+v1.2.4"
    ));
    assert_eq!(
        fs::read_to_string(dir.path().join("Project.toml")).unwrap(),
        PROJECT
    );
}

#[test]
fn test_start_release_without_compat_fails() {
    let dir = package_repo();
    fs::write(
        dir.path().join("Project.toml"),
        "name = \"P\"\nversion = \"1.2.4-DEV\"\n",
    )
    .unwrap();
    let output = pkg_release(dir.path(), &["start-release", "--dry-run"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[compat]"));
}

#[test]
fn test_missing_manifest() {
    let dir = package_repo();
    fs::remove_file(dir.path().join("Project.toml")).unwrap();
    let output = pkg_release(dir.path(), &["bump-version"]);

    assert_eq!(output.status.code(), Some(1));
}
