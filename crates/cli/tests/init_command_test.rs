//! Integration tests for `envrun init`

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn envrun() -> Command {
    Command::cargo_bin("envrun").unwrap()
}

#[test]
fn test_init_writes_a_working_config() {
    let dir = TempDir::new().unwrap();

    envrun()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));

    assert!(dir.path().join("envrun.toml").is_file());

    // The generated file must list and plan cleanly.
    envrun()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("default (default) - Full QA gate"))
        .stdout(predicate::str::contains("pytest"));

    envrun()
        .current_dir(dir.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pip install"))
        .stdout(predicate::str::contains("--ignore=W503"));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("envrun.toml"), "# hand-written\n").unwrap();

    envrun()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("--force"));

    let text = std::fs::read_to_string(dir.path().join("envrun.toml")).unwrap();
    assert_eq!(text, "# hand-written\n");
}

#[test]
fn test_init_force_overwrites() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("envrun.toml"), "# hand-written\n").unwrap();

    envrun()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));

    let text = std::fs::read_to_string(dir.path().join("envrun.toml")).unwrap();
    assert!(text.contains("[env.default]"));
}

#[test]
fn test_init_honors_cwd_flag() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("project");
    std::fs::create_dir(&target).unwrap();

    envrun()
        .args(["init", "--cwd"])
        .arg(&target)
        .assert()
        .success();

    assert!(target.join("envrun.toml").is_file());
}
