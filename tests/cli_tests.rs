//! Integration tests for the CLI interface
//!
//! Tests the main entry point, both commands and the error exit paths.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write as _;
use tempfile::TempDir;

fn sample_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_overview_help() {
    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("overview")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quality flags"));
}

#[test]
fn test_report_help() {
    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--out-dir"))
        .stdout(predicate::str::contains("--max-hist-columns"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_overview_prints_dimensions_and_flags() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "id,age,city\n1,10,A\n2,20,B\n3,,A\n");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("overview")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 3"))
        .stdout(predicate::str::contains("Columns: 3"))
        .stdout(predicate::str::contains("has_missing: true"))
        .stdout(predicate::str::contains("quality_score:"));
}

#[test]
fn test_overview_missing_file_fails() {
    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("overview")
        .arg("/no/such/file.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Load error"));
}

#[test]
fn test_overview_with_semicolon_separator() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "a;b\n1;2\n3;4\n");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("overview")
        .arg(&csv)
        .arg("--sep")
        .arg(";")
        .assert()
        .success()
        .stdout(predicate::str::contains("Columns: 2"));
}

#[test]
fn test_overview_unknown_encoding_fails() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "a\n1\n");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("overview")
        .arg(&csv)
        .arg("--encoding")
        .arg("koi8-r")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_report_writes_full_bundle() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(
        &dir,
        "data.csv",
        "id,age,city\n1,10,A\n2,,B\n3,30,A\n4,40,B\n",
    );
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg(&csv)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report generated in:"));

    assert!(out.join("report.md").exists());
    assert!(out.join("summary.csv").exists());
    assert!(out.join("missing.csv").exists());
    assert!(out.join("correlation.csv").exists());
    assert!(out.join("top_categories/city.csv").exists());
    assert!(out.join("hist_id.png").exists());
    assert!(out.join("hist_age.png").exists());
    assert!(out.join("missing_matrix.png").exists());
    assert!(out.join("correlation_heatmap.png").exists());

    // age is 25% missing, above the default 10% threshold
    let md = std::fs::read_to_string(out.join("report.md")).unwrap();
    assert!(md.contains("WARNING: column `age`"));
    assert!(!md.contains("WARNING: column `id`"));
}

#[test]
fn test_report_single_numeric_column_has_no_correlation() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "x,city\n1,A\n2,B\n3,A\n");
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg(&csv)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success();

    assert!(!out.join("correlation.csv").exists());
    assert!(!out.join("correlation_heatmap.png").exists());
}

#[test]
fn test_report_top_k_is_applied() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "city\nA\nA\nB\nB\nB\nC\n");
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg(&csv)
        .arg("--out-dir")
        .arg(&out)
        .arg("--top-k-categories")
        .arg("2")
        .assert()
        .success();

    let table = std::fs::read_to_string(out.join("top_categories/city.csv")).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines, vec!["value,count", "B,3", "A,2"]);
}

#[test]
fn test_report_zero_top_k_fails() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "a\n1\n");
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg(&csv)
        .arg("--out-dir")
        .arg(&out)
        .arg("--top-k-categories")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_report_custom_title_appears_in_markdown() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "a,b\n1,2\n3,4\n");
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg(&csv)
        .arg("--out-dir")
        .arg(&out)
        .arg("--title")
        .arg("Quarterly Data Check")
        .assert()
        .success();

    let md = std::fs::read_to_string(out.join("report.md")).unwrap();
    assert!(md.starts_with("# Quarterly Data Check"));
}

#[test]
fn test_report_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "id,age,city\n1,10,A\n2,20,B\n3,,A\n");
    let out_a = dir.path().join("a");
    let out_b = dir.path().join("b");

    for out in [&out_a, &out_b] {
        let mut cmd = Command::cargo_bin("eda").unwrap();
        cmd.arg("report")
            .arg(&csv)
            .arg("--out-dir")
            .arg(out)
            .assert()
            .success();
    }

    for file in ["report.md", "summary.csv", "missing.csv", "correlation.csv"] {
        let a = std::fs::read(out_a.join(file)).unwrap();
        let b = std::fs::read(out_b.join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between runs");
    }
}

#[test]
fn test_report_ragged_csv_fails() {
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir, "data.csv", "a,b\n1,2\n3\n");
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("eda").unwrap();
    cmd.arg("report")
        .arg(&csv)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Load error"));
}
