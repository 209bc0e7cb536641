//! Integration tests for init and config commands

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::periodical_cmd;

#[test]
fn test_init_creates_workspace() {
    let temp = TempDir::new().unwrap();

    periodical_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized periodical workspace"));

    assert!(temp.path().join(".periodical").is_dir());

    let content = fs::read_to_string(temp.path().join(".periodical/config.toml")).unwrap();
    assert!(content.contains("granularity = \"days\""));
    assert!(content.contains("earliest_plausible = \"1605-09-12\""));
    assert!(content.contains("created"));

    let course = fs::read_to_string(temp.path().join("course.xml")).unwrap();
    assert!(course.starts_with("<?xml"));
}

#[test]
fn test_init_creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("gazette");

    periodical_cmd().arg("init").arg(&path).assert().success();

    assert!(path.join(".periodical/config.toml").exists());
}

#[test]
fn test_init_already_initialized_fails() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_command_outside_workspace_fails() {
    let temp = TempDir::new().unwrap();

    periodical_cmd()
        .current_dir(temp.path())
        .args(["block", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("periodical init"));
}

#[test]
fn test_workspace_found_from_subdirectory() {
    let temp = TempDir::new().unwrap();
    periodical_cmd().arg("init").arg(temp.path()).assert().success();
    let subdir = temp.path().join("scans");
    fs::create_dir(&subdir).unwrap();

    periodical_cmd()
        .current_dir(&subdir)
        .args(["block", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No blocks found"));
}

#[test]
fn test_workspace_from_env() {
    let temp = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(elsewhere.path())
        .env("PERIODICAL_ROOT", temp.path())
        .args(["config", "granularity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("days"));
}

#[test]
fn test_config_get_granularity() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(temp.path())
        .arg("config")
        .arg("granularity")
        .assert()
        .success()
        .stdout(predicate::str::contains("days"));
}

#[test]
fn test_config_set_granularity() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(temp.path())
        .args(["config", "granularity", "weeks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set granularity = weeks"));

    periodical_cmd()
        .current_dir(temp.path())
        .args(["config", "granularity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weeks"));
}

#[test]
fn test_config_set_invalid_granularity() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(temp.path())
        .args(["config", "granularity", "fortnights"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid granularity"))
        .stderr(predicate::str::contains("periodical config granularity weeks"));
}

#[test]
fn test_config_list() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(temp.path())
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("granularity = days"))
        .stdout(predicate::str::contains("issue_colours = #CC0000;"))
        .stdout(predicate::str::contains("earliest_plausible = 1605-09-12"))
        .stdout(predicate::str::contains("created = "));
}

#[test]
fn test_config_created_is_read_only() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(temp.path())
        .args(["config", "created", "2020-01-01T00:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
}

#[test]
fn test_config_unknown_key() {
    let temp = TempDir::new().unwrap();

    periodical_cmd().arg("init").arg(temp.path()).assert().success();

    periodical_cmd()
        .current_dir(temp.path())
        .args(["config", "editor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key: 'editor'"));
}
