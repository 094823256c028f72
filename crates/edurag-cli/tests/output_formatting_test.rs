//! Integration tests for CLI output formatting
//!
//! These tests verify JSON output and failure behavior without a bundle.

use std::path::PathBuf;
use std::process::Command;

fn edurag_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("edurag");
    path
}

#[test]
fn test_inspect_json_output_is_valid() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = Command::new(edurag_bin())
        .args(["--course-dir"])
        .arg(temp_dir.path())
        .args(["--json", "inspect"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert!(parsed.get("status").is_some(), "Should have status field");
    let data = parsed.get("data").expect("Should have data field");
    let rows = data.as_array().expect("data should be an array of config rows");
    assert!(rows.iter().any(|r| r["key"] == "chunk_size"));
    assert!(rows.iter().any(|r| r["key"] == "top_k"));
}

#[test]
fn test_inspect_reports_file_source() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("edurag.toml"), "top_k = 3\n").unwrap();

    let output = Command::new(edurag_bin())
        .args(["--course-dir"])
        .arg(temp_dir.path())
        .args(["--json", "inspect"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = parsed["data"].as_array().unwrap();

    let top_k = rows.iter().find(|r| r["key"] == "top_k").expect("top_k row");
    assert_eq!(top_k["value"], "3");
    assert_eq!(top_k["source"], "file");
}

#[test]
fn test_status_fails_without_bundle() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = Command::new(edurag_bin())
        .args(["--course-dir"])
        .arg(temp_dir.path())
        .arg("status")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Status without a bundle should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No course bundle"), "Should point at the missing bundle");
}

#[test]
fn test_retrieve_fails_without_bundle() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = Command::new(edurag_bin())
        .args(["--course-dir"])
        .arg(temp_dir.path())
        .args(["retrieve", "חוזה"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
