//! Binary integration tests for CLI commands
//!
//! These tests run the actual folio binary to exercise the CLI code paths.

#![expect(clippy::unwrap_used, reason = "integration test assertions")]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn folio_bin(prefs: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
    cmd.env("FOLIO_PREFS_PATH", prefs);
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    let output = folio_bin(&temp_dir.path().join("prefs.json"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("replay"));
}

#[test]
fn test_cli_invalid_argument_shows_help() {
    let temp_dir = TempDir::new().unwrap();
    let output = folio_bin(&temp_dir.path().join("prefs.json"))
        .arg("--invalid-flag")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_cli_validate() {
    let temp_dir = TempDir::new().unwrap();
    let prefs = temp_dir.path().join("prefs.json");

    let ok = folio_bin(&prefs)
        .args(["validate", "--name", "Al", "--email", "a@b.co"])
        .args(["--message", "Hello there friend"])
        .output()
        .unwrap();
    assert!(ok.status.success());

    let bad = folio_bin(&prefs)
        .args(["validate", "--email", "a b@c.com"])
        .output()
        .unwrap();
    assert_eq!(bad.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&bad.stderr);
    assert!(stderr.contains("name: Name is required"));
    assert!(stderr.contains("email: Please enter a valid email address"));
}

#[test]
fn test_cli_theme_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let prefs = temp_dir.path().join("nested").join("prefs.json");

    let show = folio_bin(&prefs).args(["theme", "show"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&show.stdout).trim(), "system");

    let set = folio_bin(&prefs)
        .args(["theme", "set", "dark"])
        .output()
        .unwrap();
    assert!(set.status.success());
    assert!(fs::read_to_string(&prefs).unwrap().contains("dark"));

    let show = folio_bin(&prefs).args(["theme", "show"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&show.stdout).trim(), "dark");

    let clear = folio_bin(&prefs).args(["theme", "clear"]).output().unwrap();
    assert!(clear.status.success());
    let show = folio_bin(&prefs).args(["theme", "show"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&show.stdout).trim(), "system");
}

#[test]
fn test_cli_replay_prints_snapshots() {
    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("session.json");
    fs::write(
        &script,
        r#"{"steps": [{"type": "toggle_theme"}, {"type": "snapshot"}]}"#,
    )
    .unwrap();

    let output = folio_bin(&temp_dir.path().join("prefs.json"))
        .arg("replay")
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshots: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = snapshots.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["theme"], "dark");
    assert_eq!(list[0]["stored_theme"], "dark");
}

#[test]
fn test_cli_replay_rejects_bad_config() {
    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("session.json");
    let config = temp_dir.path().join("config.json");
    fs::write(&script, "{}").unwrap();
    fs::write(&config, r#"{"reveal_threshold": 2.0}"#).unwrap();

    let output = folio_bin(&temp_dir.path().join("prefs.json"))
        .arg("replay")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reveal_threshold"));
}
