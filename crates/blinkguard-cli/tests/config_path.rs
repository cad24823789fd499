use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("safe_boundary = 25"));
    assert!(contents.contains("keep_seconds = 60.0"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_generate_prints_template() {
    cargo_bin_cmd!("blinkguard")
        .args(["config", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eviction = \"one_per_insert\""))
        .stdout(predicate::str::contains("[alert]"));
}

#[test]
fn test_invalid_config_fails_watch() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "keep_seconds = -1.0\n").unwrap();

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", dir.path())
        .args(["watch", "--input", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("keep_seconds"));
}
