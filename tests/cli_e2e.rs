//! End-to-end CLI tests for commpack.
//!
//! These tests run the actual binary against archives written to a temporary
//! directory and check both the console output and the CSV it leaves behind.
//!
//! # Test Categories
//!
//! - **Voice**: takeout directory to `Message_Export.csv`
//! - **Mbox**: archive to `<path>.csv`, columns chosen by environment
//! - **Error handling**: missing input, bad configuration, bad arguments
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

/// Configuration keys read by the mbox subcommand.
const MBOX_KEYS: &[&str] = &[
    "DATE",
    "SENT_FROM",
    "SENT_TO",
    "CC",
    "SUBJECT",
    "BODY",
    "DATE_FORMAT",
    "UTC",
    "SUBJECT_PREPEND",
    "CANT_CONVERT_COUNT",
    "BLACKLIST_COUNT",
];

// ============================================================================
// Test Fixtures
// ============================================================================

fn setup_takeout() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    let calls = dir.path().join("Voice").join("Calls");
    fs::create_dir_all(&calls).unwrap();

    let text = r#"<html><body>
<div class="message"><abbr class="dt">Jan 5, 2021, 3:04:05 PM
Eastern Time</abbr>: <q>hello</q></div>
<div class="message"><abbr class="dt">Jan 5, 2021, 3:05:00 PM
Eastern Time</abbr>: <q>Привет 👋</q></div>
</body></html>"#;
    fs::write(calls.join("+15551234567 - Text - 2021-01-05T20_04_05Z.html"), text).unwrap();

    let missed = r#"<html><body>
<div class="haudio"><abbr class="published">Aug 1, 2019, 9:15:00 PM
Pacific Time</abbr></div>
</body></html>"#;
    fs::write(calls.join("+15559876543 - Missed - 2019-08-02T04_15_00Z.html"), missed).unwrap();

    fs::write(calls.join("README.html"), "<html></html>").unwrap();
    dir
}

const MBOX: &str = "From ann@example.com Tue Jan  5 15:04:05 2021
Date: Tue, 05 Jan 2021 15:04:05 -0500
From: Ann <ann@example.com>
To: bob@junk.biz
Subject: Quarterly numbers
Content-Type: text/plain; charset=utf-8

Numbers attached.

Sent from my phone

From bob@junk.biz Wed Jan  6 09:00:00 2021
Date: Wed, 06 Jan 2021 09:00:00 +0000
From: bob@junk.biz
To: ann@example.com
Subject: Re: Quarterly

Thanks!
";

/// Writes the archive into a fresh working directory and returns both.
fn setup_mbox() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("finance.mbox");
    fs::write(&path, MBOX).unwrap();
    (dir, path)
}

fn commpack() -> Command {
    Command::from_std(std::process::Command::new(env!("CARGO_BIN_EXE_commpack")))
}

/// Mbox command with a clean configuration environment, run inside `cwd`.
fn mbox_cmd(cwd: &Path) -> Command {
    let mut cmd = commpack();
    for key in MBOX_KEYS {
        cmd.env_remove(key);
    }
    cmd.current_dir(cwd);
    cmd
}

// ============================================================================
// Voice
// ============================================================================

#[test]
fn test_voice_writes_export() {
    let dir = setup_takeout();

    commpack()
        .args(["voice", "-i"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done"))
        .stdout(predicate::str::contains("Records:"));

    let csv = fs::read_to_string(dir.path().join("Message_Export.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Title,Date (GMT),Type,From,Content");
    // Files in name order: "+1555123..." sorts before "+1555987..."
    assert_eq!(lines[1], "📟 SMS,2021-01-05T20:04:05Z,📟 SMS,+15551234567,hello");
    assert_eq!(lines[2], "📟 SMS,2021-01-05T20:05:00Z,📟 SMS,+15551234567,Привет 👋");
    assert_eq!(lines[3], "📴 Call-Missed,2019-08-02T04:15:00Z,📴 Call-Missed,+15559876543,");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_voice_alias_and_output_dir() {
    let dir = setup_takeout();
    let out = tempdir().unwrap();

    commpack()
        .args(["gvoice", "--input"])
        .arg(dir.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Google Voice"));

    assert!(out.path().join("Message_Export.csv").exists());
    assert!(!dir.path().join("Message_Export.csv").exists());
}

#[test]
fn test_voice_missing_calls_dir() {
    let dir = tempdir().unwrap();

    commpack()
        .args(["voice", "-i"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_voice_requires_input() {
    commpack()
        .arg("voice")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

// ============================================================================
// Mbox
// ============================================================================

#[test]
fn test_mbox_writes_export() {
    let (dir, path) = setup_mbox();

    mbox_cmd(dir.path())
        .env("DATE", "Date")
        .env("SENT_FROM", "From")
        .env("SUBJECT", "Subject")
        .env("BODY", "Body")
        .env("UTC", "1")
        .arg("mbox")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated"))
        .stdout(predicate::str::contains(
            "for 2 messages (0 could not convert; 0 blacklisted)",
        ));

    let csv = fs::read_to_string(dir.path().join("finance.mbox.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,From,Subject,Body");
    assert_eq!(
        lines[1],
        "2021-01-05T20:04:05Z,ann@example.com,Quarterly numbers,Numbers attached."
    );
    assert_eq!(lines[2], "2021-01-06T09:00:00Z,bob@junk.biz,Re: Quarterly,Thanks!");
}

#[test]
fn test_mbox_column_disabled_by_env() {
    let (dir, path) = setup_mbox();

    mbox_cmd(dir.path())
        .env("DATE", "Sent")
        .env("SUBJECT", "0")
        .env("BODY", "Text")
        .arg("mbox")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Columns: Sent, Text"));

    let csv = fs::read_to_string(dir.path().join("finance.mbox.csv")).unwrap();
    assert!(csv.starts_with("Sent,Text\n"));
    assert!(!csv.contains("Quarterly"));
}

#[test]
fn test_mbox_reads_dotenv_and_sidecars() {
    let (dir, path) = setup_mbox();
    fs::write(dir.path().join(".env"), "SUBJECT=Topic\nSUBJECT_PREPEND=\"[fin] \"\nCANT_CONVERT_COUNT=4\n").unwrap();
    fs::write(dir.path().join(".owners"), r#"{"finance": ["Dana"]}"#).unwrap();
    fs::write(dir.path().join(".blacklist"), "junk.biz\n").unwrap();

    mbox_cmd(dir.path())
        .arg("mbox")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(4 could not convert; 1 blacklisted)"))
        .stdout(predicate::str::contains("owners: Dana"))
        .stdout(predicate::str::contains("blacklisted domains: junk.biz"));

    let csv = fs::read_to_string(dir.path().join("finance.mbox.csv")).unwrap();
    assert!(csv.starts_with("Topic\n"));
    assert!(csv.contains("[fin] Re: Quarterly\n"));
}

#[test]
fn test_mbox_python_literal_owners() {
    let (dir, path) = setup_mbox();
    fs::write(dir.path().join(".owners"), "{'finance': ['Dana', 'Eli']}\n").unwrap();

    mbox_cmd(dir.path())
        .env("DATE", "Date")
        .arg("mbox")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("owners: Dana, Eli"));
}

#[test]
fn test_mbox_unreadable_owners_still_exports() {
    let (dir, path) = setup_mbox();
    fs::write(dir.path().join(".owners"), "finance = Dana\n").unwrap();

    mbox_cmd(dir.path())
        .env("DATE", "Date")
        .arg("mbox")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("for 2 messages"));

    let csv = fs::read_to_string(dir.path().join("finance.mbox.csv")).unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[test]
fn test_mbox_invalid_date_format() {
    let (dir, path) = setup_mbox();

    mbox_cmd(dir.path())
        .env("DATE", "Date")
        .env("DATE_FORMAT", "%Q")
        .arg("mbox")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATE_FORMAT"));

    assert!(!dir.path().join("finance.mbox.csv").exists());
}

#[test]
fn test_mbox_missing_archive() {
    let dir = tempdir().unwrap();

    mbox_cmd(dir.path())
        .env("DATE", "Date")
        .args(["mbox", "nope.mbox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_no_arguments() {
    commpack().assert().failure();
}

#[test]
fn test_unknown_subcommand() {
    commpack().arg("sms").assert().failure();
}

#[test]
fn test_help_lists_configuration_keys() {
    commpack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUBJECT_PREPEND"));
}
