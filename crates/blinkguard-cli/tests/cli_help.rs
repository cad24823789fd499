use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("blinkguard")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("alerts"));
}

#[test]
fn test_watch_help_shows_overrides() {
    cargo_bin_cmd!("blinkguard")
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--safe-boundary"))
        .stdout(predicate::str::contains("--keep-seconds"))
        .stdout(predicate::str::contains("drain-stale"))
        .stdout(predicate::str::contains("--ack"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("blinkguard")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}
