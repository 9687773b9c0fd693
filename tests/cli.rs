//! Integration tests for the command-line program.
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run the program in `dir`, isolated from the user's settings file
fn run_pbsgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pbsgen"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("PBSGEN_LOG_LEVEL", "error")
        .output()
        .unwrap()
}

#[test]
fn test_generate_twice_identical() {
    let args = ["edge", "7", "7", "4-8-2", "5-11-3", "1-5", "3", "0"];

    let dir = tempdir().unwrap();
    let output = run_pbsgen(dir.path(), &args);
    assert_eq!(output.status.code(), Some(0));
    let first = fs::read(dir.path().join("edge_7x7_IOs1.csv")).unwrap();

    let output = run_pbsgen(dir.path(), &args);
    assert_eq!(output.status.code(), Some(0));
    let second = fs::read(dir.path().join("edge_7x7_IOs1.csv")).unwrap();

    assert_eq!(first, second);
    assert!(
        String::from_utf8(first)
            .unwrap()
            .lines()
            .nth(1)
            .unwrap()
            .starts_with("7x7, 1, 4, 5, 1,")
    );
    assert!(dir.path().join("edge_7x7_IO1_8_11_5.toml").is_file());
}

#[test]
fn test_too_few_arguments() {
    let dir = tempdir().unwrap();
    let output = run_pbsgen(dir.path(), &["edge", "7", "7", "4-8-2", "5-11-3", "1-5", "3"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_malformed_range() {
    let dir = tempdir().unwrap();
    let output = run_pbsgen(dir.path(), &["edge", "7", "7", "8-4", "5", "1", "3", "0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("start is greater than end"));
}

#[test]
fn test_destination_unavailable() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("edge_7x7_IOs1.csv")).unwrap();
    let output = run_pbsgen(dir.path(), &["edge", "7", "7", "4", "5", "1", "3", "0"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("make sure that it is not open in another program"));
}

#[test]
fn test_help() {
    let dir = tempdir().unwrap();
    let output = run_pbsgen(dir.path(), &["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8(output.stdout).unwrap().contains("IO_COORDS"));
}
