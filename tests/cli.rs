mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(artifacts: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rental-price"))
        .env("RENTAL_LOG_LEVEL", "off")
        .arg("--artifacts")
        .arg(artifacts)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    common::write_artifacts(dir.path());
    dir
}

#[test]
fn predict_prints_the_default_price() {
    let dir = fixture();
    let output = run(dir.path(), &["predict"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("85.43€"), "{}", stdout(&output));
}

#[test]
fn predict_json_reports_price_and_display() {
    let dir = fixture();
    let output = run(dir.path(), &["predict", "--json"]);
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!((body["price"].as_f64().unwrap() - common::GOLDEN_DEFAULT_PRICE).abs() < 1e-6);
    assert_eq!(body["display"], "85.43€");
}

#[test]
fn predict_rejects_out_of_range_assignment() {
    let dir = fixture();
    let output = run(dir.path(), &["predict", "--set", "beds=99"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn batch_reports_every_line() {
    let dir = fixture();
    let input = dir.path().join("listings.jsonl");
    fs::write(&input, "{}\n{\"beds\": 99}\n{}\n").unwrap();

    let output = run(dir.path(), &["batch", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3, "{text}");
    assert!(lines[0].starts_with("1\t") && lines[0].ends_with("85.43€"));
    assert!(lines[1].starts_with("2\t") && lines[1].contains("line 2"));
    assert_eq!(lines[1].matches("invalid input").count(), 0);
    assert!(lines[2].starts_with("3\t") && lines[2].ends_with("85.43€"));
}

#[test]
fn batch_of_valid_lines_succeeds() {
    let dir = fixture();
    let input = dir.path().join("listings.jsonl");
    fs::write(&input, "{}\n\n{\"bedrooms\": 3, \"beds\": 4, \"bathrooms\": 2, \"cleaning_fee\": 80}\n").unwrap();

    let output = run(dir.path(), &["batch", input.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("1\t85.43€"), "{text}");
    assert!(text.contains("2\t111.49€"), "{text}");
}

#[test]
fn check_lists_loaded_artifacts() {
    let dir = fixture();
    let output = run(dir.path(), &["check"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for kind in ["scaler", "projector", "regressor"] {
        assert!(text.contains(kind), "{kind} missing from {text}");
    }
    assert!(text.contains("24 columns"));
}

#[test]
fn check_against_missing_artifacts_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir.path().join("nowhere"), &["check"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}
