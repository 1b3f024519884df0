//! Integration tests for the docshell binaries.
//!
//! These tests run the compiled binaries and check startup failures, which
//! must end the process with exit code 1 before any command is read.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Write a config file into a fresh temp dir.
fn create_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.properties");
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Run a binary with `config` as its argument and `stdin` as input.
fn run_binary(binary: &str, config: &Path, stdin: &str) -> Output {
    let mut child = Command::new(binary)
        .arg(config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");
    // The process may already have exited on a startup failure
    if let Some(mut input) = child.stdin.take() {
        let _ = input.write_all(stdin.as_bytes());
    }
    child.wait_with_output().expect("Failed to wait for binary")
}

fn shell(config: &Path, stdin: &str) -> Output {
    run_binary(env!("CARGO_BIN_EXE_docshell"), config, stdin)
}

fn exporter(config: &Path) -> Output {
    run_binary(env!("CARGO_BIN_EXE_docshell-export"), config, "")
}

#[test]
fn test_missing_config_exits_with_one() {
    let temp_dir = TempDir::new().unwrap();
    let output = shell(&temp_dir.path().join("absent.properties"), "q\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"), "stderr: {}", stderr);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Connected db"));
}

#[test]
fn test_missing_dbname_exits_with_one() {
    let (_temp, config) = create_config("dbconnection=mongodb://localhost:27017\n");
    let output = shell(&config, "q\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dbname"));
}

#[test]
fn test_malformed_uri_exits_with_one() {
    let (_temp, config) = create_config("dbconnection=not-a-uri\ndbname=shop\n");
    let output = shell(&config, "q\n");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Connection error"), "stderr: {}", stderr);
}

#[test]
fn test_exporter_missing_config_exits_with_one() {
    let temp_dir = TempDir::new().unwrap();
    let output = exporter(&temp_dir.path().join("absent.properties"));

    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Exported with total"));
}

#[test]
fn test_exporter_malformed_uri_exits_with_one() {
    let (_temp, config) = create_config("dbconnection=::::\ndbname=images\n");
    let output = exporter(&config);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Connection error"));
}
