//! Integration tests for the asnd binary's command line

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("asnd").expect("Failed to find asnd binary");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("WHOIS-to-REST failover"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--rate-limit-requests"))
        .stdout(predicate::str::contains("--whois-host"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("asnd").expect("Failed to find asnd binary");
    cmd.arg("--version");

    let output = cmd.output().expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("asnd "));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let mut cmd = Command::cargo_bin("asnd").expect("Failed to find asnd binary");
    cmd.arg("--definitely-not-a-flag");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--definitely-not-a-flag"));
}

#[test]
fn test_invalid_port_is_rejected() {
    let mut cmd = Command::cargo_bin("asnd").expect("Failed to find asnd binary");
    cmd.args(["--port", "not-a-port"]);

    cmd.assert().failure();
}
