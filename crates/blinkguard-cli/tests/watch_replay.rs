use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

/// One minute sampled every 0.25s, with a blink on each of the first
/// `blinks` seconds.
fn minute_with_blinks(blinks: u32) -> String {
    let mut out = String::from("# timestamp state\n");
    for i in 0..=240u32 {
        let state = if i % 4 == 1 && i / 4 < blinks {
            "closed"
        } else {
            "open"
        };
        writeln!(out, "{} {state}", f64::from(i) * 0.25).unwrap();
    }
    out
}

/// Eyes never close, sampled every 0.5s.
fn staring(frames: u32) -> String {
    (0..frames)
        .map(|i| format!("{{\"timestamp\": {}, \"state\": \"open\"}}\n", f64::from(i) * 0.5))
        .collect()
}

fn write_input(dir: &Path, contents: &str) -> String {
    let path = dir.join("observations.txt");
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_watch_safe_session_has_no_alerts() {
    let home = tempdir().unwrap();
    let input = write_input(home.path(), &minute_with_blinks(40));

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["watch", "--input", &input, "-b", "25", "--ack", "auto", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 241 frames, 0 alert(s), 0 suppressed",
        ));

    assert!(!home.path().join("alerts.jsonl").exists());
}

#[test]
fn test_watch_status_line_reports_rate() {
    let home = tempdir().unwrap();
    let input = write_input(home.path(), &minute_with_blinks(40));

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["--input", &input, "-b", "25", "--ack", "auto"])
        .assert()
        .success()
        .stderr(predicate::str::contains("blinks/min:  40 [safe]"))
        .stderr(predicate::str::contains("blinks/min:  -1 [unknown]"));
}

#[test]
fn test_watch_swallows_first_danger_then_alerts() {
    let home = tempdir().unwrap();
    let input = write_input(home.path(), &staring(300));

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["watch", "--input", &input, "-b", "25", "--ack", "auto", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 300 frames, 2 alert(s), 2 suppressed",
        ))
        .stderr(predicate::str::contains(
            "Blink rate too low: 0 blinks/min (safe at 25 or more)",
        ));

    let history = fs::read_to_string(home.path().join("alerts.jsonl")).unwrap();
    let records: Vec<serde_json::Value> = history
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["acknowledgement"], "dismissed");
    assert_eq!(records[0]["safe_boundary"], 25);
}

#[test]
fn test_watch_exit_answer_stops_monitoring() {
    let home = tempdir().unwrap();
    let input = write_input(home.path(), &staring(300));

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["watch", "--input", &input, "--ack", "prompt", "--quiet", "--no-record"])
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 101 frames, 1 alert(s), 1 suppressed",
        ))
        .stderr(predicate::str::contains("Exiting."));

    assert!(!home.path().join("alerts.jsonl").exists());
}

#[test]
fn test_watch_reads_stdin() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["watch", "--input", "-", "--ack", "auto", "--quiet"])
        .write_stdin("0.0 open\n0.5 closed\n1.0 open\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 frames"));
}

#[test]
fn test_watch_malformed_record_fails() {
    let home = tempdir().unwrap();
    let input = write_input(home.path(), "0.0 open\nbogus\n");

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["watch", "--input", &input, "--ack", "auto", "--quiet"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Processed 1 frames"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_watch_malformed_record_fails_despite_retries() {
    let home = tempdir().unwrap();
    let input = write_input(home.path(), "0.0 open\nbogus\n1.0 closed\n");

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args([
            "watch", "--input", &input, "--ack", "auto", "--retries", "1", "--quiet",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Processed 1 frames"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_watch_missing_input_fails() {
    let home = tempdir().unwrap();
    let missing = home.path().join("missing.txt");

    cargo_bin_cmd!("blinkguard")
        .env("BLINKGUARD_HOME", home.path())
        .args(["watch", "--input", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("open observations from"));
}
