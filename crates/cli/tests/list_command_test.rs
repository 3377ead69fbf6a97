//! Integration tests for `envrun list`

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn envrun() -> Command {
    Command::cargo_bin("envrun").unwrap()
}

const CONFIG: &str = r#"
[settings]
default_env = "pytest"

[env.pytest]
description = "Unit tests"
deps = ["pytest"]
commands = ["pytest"]

[env.lint]
commands = ["flake8 src"]
"#;

#[test]
fn test_list_shows_environments_with_default_marker() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("envrun.toml"), CONFIG).unwrap();

    envrun()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pytest (default) - Unit tests"))
        .stdout(predicate::str::contains("lint"));
}

#[test]
fn test_list_json_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("envrun.toml"), CONFIG).unwrap();

    let output = envrun()
        .current_dir(dir.path())
        .args(["list", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = summaries
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["lint", "pytest"]);
    assert_eq!(summaries[1]["is_default"], true);
    assert_eq!(summaries[1]["deps"], 1);
}

#[test]
fn test_list_with_no_environments() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("envrun.toml"), "[settings]\n").unwrap();

    envrun()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No environments defined"));
}

#[test]
fn test_list_without_config_fails() {
    let dir = TempDir::new().unwrap();

    envrun()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no envrun.toml found"));
}

#[test]
fn test_list_accepts_an_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, CONFIG).unwrap();

    envrun()
        .args(["list", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("pytest"));
}
