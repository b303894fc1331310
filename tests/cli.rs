//! End-to-end checks of the `macapp` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn macapp() -> Command {
    let mut cmd = Command::cargo_bin("macapp").unwrap();
    cmd.env_remove("MACAPP_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_every_command() {
    let mut assert = macapp().arg("--help").assert().success();
    for name in [
        "build",
        "build-release",
        "run",
        "format",
        "bundle-app",
        "package-dmg",
        "clean",
    ] {
        assert = assert.stdout(predicate::str::contains(name));
    }
}

#[test]
fn unknown_command_fails() {
    macapp()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'deploy'"));
}

#[test]
fn clean_twice_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(".build/release")).unwrap();
    std::fs::create_dir_all(dir.path().join("dist/staging")).unwrap();
    std::fs::write(dir.path().join("Package.swift"), "// swift-tools-version:5.9\n").unwrap();

    for _ in 0..2 {
        macapp()
            .arg("clean")
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleaning build artifacts..."))
            .stdout(predicate::str::contains("✅ Clean complete"));
    }

    assert!(!dir.path().join(".build").exists());
    assert!(!dir.path().join("dist").exists());
    assert!(dir.path().join("Package.swift").exists());
}

#[test]
fn clean_honors_configured_directories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Bundle.toml"),
        "[paths]\nbuild_dir = \"out\"\ndist_dir = \"artifacts\"\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    std::fs::create_dir_all(dir.path().join("artifacts")).unwrap();

    macapp().arg("clean").current_dir(dir.path()).assert().success();

    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("artifacts").exists());
}

#[test]
fn malformed_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bundle.toml"), "[dmg]\nwindow_width = 1\n").unwrap();

    macapp()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();

    macapp()
        .arg("clean")
        .current_dir(dir.path())
        .env("MACAPP_CONFIG", dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn missing_formatter_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();

    macapp()
        .arg("format")
        .current_dir(dir.path())
        .env("PATH", empty_path.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "swift-format not found. Install with: brew install swift-format",
        ))
        .stdout(predicate::function(|out: &str| {
            out.matches("swift-format not found").count() == 1
        }))
        .stderr(predicate::str::is_empty());
}

#[test]
fn clean_refuses_directories_outside_the_project() {
    let root = tempfile::tempdir().unwrap();
    let project = root.path().join("app");
    let sibling = root.path().join("keep");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::create_dir_all(&sibling).unwrap();
    std::fs::write(project.join("Package.swift"), "// swift-tools-version:5.9\n").unwrap();

    for paths in ["dist_dir = \"\"", "build_dir = \"..\"", "dist_dir = \"../keep\""] {
        std::fs::write(project.join("Bundle.toml"), format!("[paths]\n{paths}\n")).unwrap();

        macapp()
            .arg("clean")
            .current_dir(&project)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("inside the project"));

        assert!(project.join("Package.swift").is_file(), "{paths}");
        assert!(sibling.is_dir(), "{paths}");
    }
}
