//! Corruption recovery tests for the rehab binary.
//!
//! These tests verify the system can handle:
//! - Corrupted week and history files
//! - Missing files
//! - Out-of-range stored values

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(dir: &Path) -> Command {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "").expect("Failed to write config");
    }
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rehab"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(config_path);
    cmd
}

fn write_data_file(dir: &Path, name: &str, contents: &str) {
    let data_dir = dir.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join(name), contents).expect("Failed to write data file");
}

#[test]
fn test_corrupted_week_file_falls_back_to_week_one() {
    let temp_dir = setup_test_dir();
    write_data_file(temp_dir.path(), "state.json", "{ invalid json }}}}");

    cli(temp_dir.path())
        .arg("week")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 1 of 6"));

    // Next change rewrites a valid file
    cli(temp_dir.path()).args(["week", "up"]).assert().success();
    let state = fs::read_to_string(temp_dir.path().join("data/state.json")).unwrap();
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&state);
    assert!(parsed.is_ok(), "State should be valid JSON");
}

#[test]
fn test_corrupted_history_file_falls_back_to_empty() {
    let temp_dir = setup_test_dir();
    write_data_file(temp_dir.path(), "history.json", "[{\"id\": \"partial");

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet"));

    cli(temp_dir.path())
        .args(["session", "--auto-complete"])
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("data/history.json")).unwrap();
    let history: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_out_of_range_week_is_clamped() {
    let temp_dir = setup_test_dir();
    write_data_file(temp_dir.path(), "state.json", r#"{"week": 42}"#);

    cli(temp_dir.path())
        .arg("week")
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 6 of 6"));
}

#[test]
fn test_empty_history_array() {
    let temp_dir = setup_test_dir();
    write_data_file(temp_dir.path(), "history.json", "[]");

    cli(temp_dir.path())
        .args(["session", "--auto-complete"])
        .assert()
        .success();
}

#[test]
fn test_missing_data_dir_is_created_on_save() {
    let temp_dir = setup_test_dir();
    assert!(!temp_dir.path().join("data").exists());

    cli(temp_dir.path())
        .args(["session", "--auto-complete"])
        .assert()
        .success();

    assert!(temp_dir.path().join("data/history.json").exists());
}

#[test]
fn test_malformed_config_is_an_error() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[rest\ndefault_seconds = ").unwrap();

    cli(temp_dir.path()).arg("week").assert().failure();
}
