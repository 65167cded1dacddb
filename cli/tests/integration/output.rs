//! Machine-readable output tests for tcp CLI (`--output json|jsonl`).

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use serde_json::Value;
use std::fs;

fn parse_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_json_success() {
    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    let target = fx.dst.path().join("x");

    let mut cmd = cargo_bin_cmd!("tcp");
    let output = cmd
        .arg("--output")
        .arg("json")
        .arg(&a)
        .arg(&target)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let records = parse_lines(&output.stdout);
    assert_eq!(records.len(), 1);

    let value = &records[0];
    assert_eq!(value["schema_version"], "1.0");
    assert_eq!(value["status"], "complete");
    assert_eq!(value["stats"]["files_copied"], 2);
    assert_eq!(value["stats"]["bytes_copied"], 11);
    assert_eq!(value["stats"]["dirs_created"], 2);
    assert_eq!(value["stats"]["errors"], 0);
    assert!(value["stats"]["duration_ms"].is_u64());
    assert_eq!(value["config"]["preserve_attributes"], true);
    assert_eq!(value["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn test_json_collects_diagnostics() {
    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    let target = fx.dst.path().join("x");
    fs::create_dir_all(target.join("f1.txt")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcp");
    let output = cmd
        .arg("--output")
        .arg("json")
        .arg("--no-preserve")
        .arg(&a)
        .arg(&target)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.is_empty());

    let records = parse_lines(&output.stdout);
    let value = &records[0];
    assert_eq!(value["status"], "partial");
    assert_eq!(value["config"]["preserve_attributes"], false);
    assert_eq!(value["stats"]["files_copied"], 1);
    assert_eq!(value["stats"]["errors"], 1);

    let diagnostics = value["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"], "file_copy");
    assert!(diagnostics[0]["message"].as_str().unwrap().contains("f1.txt"));
}

#[test]
fn test_json_session_not_started() {
    let fx = TestFixture::new();

    let mut cmd = cargo_bin_cmd!("tcp");
    let output = cmd
        .arg("--output")
        .arg("json")
        .arg("a.zip!b.zip!c")
        .arg(fx.dst.path().join("out"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let records = parse_lines(&output.stdout);
    assert_eq!(records[0]["status"], "not_started");
    assert_eq!(records[0]["diagnostics"][0]["code"], "invalid_locator");
}

#[cfg(unix)]
#[test]
fn test_jsonl_streams_diagnostics_then_summary() {
    let fx = TestFixture::new();
    let a = fx.create_sample_tree();
    std::os::unix::fs::symlink(&a, a.join("b/loop")).unwrap();

    let mut cmd = cargo_bin_cmd!("tcp");
    let output = cmd
        .arg("--output")
        .arg("jsonl")
        .arg(&a)
        .arg(fx.dst.path().join("x"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let records = parse_lines(&output.stdout);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["record_type"], "diagnostic");
    assert_eq!(records[0]["code"], "cycle_detected");

    let summary = &records[1];
    assert_eq!(summary["record_type"], "summary");
    assert_eq!(summary["schema_version"], "1.0");
    assert_eq!(summary["status"], "partial");
    assert_eq!(summary["stats"]["files_copied"], 2);
    assert_eq!(summary["stats"]["errors"], 1);
}

#[test]
fn test_jsonl_quiet_omits_summary() {
    let fx = TestFixture::new();
    fx.create_sample_tree();

    let mut cmd = cargo_bin_cmd!("tcp");
    let output = cmd
        .arg("--output")
        .arg("jsonl")
        .arg("-q")
        .arg(fx.src.path())
        .arg(fx.dst.path().join("x"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert!(parse_lines(&output.stdout).is_empty());
}
