#![allow(clippy::unwrap_used)]

mod common;

use common::{Sandbox, read_json};
use predicates::prelude::*;
use serde_json::json;

fn write_report(sandbox: &Sandbox, name: &str, report: &serde_json::Value) -> std::path::PathBuf {
    let path = sandbox.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(report).unwrap()).unwrap();
    path
}

#[test]
fn merge_dedups_in_argument_order() {
    let sandbox = Sandbox::new();
    let first = write_report(
        &sandbox,
        "first.json",
        &json!({
            "URLS": [
                {"url": "https://example.com/a.js", "type": "javascript"},
                {"url": "https://example.com/about", "type": "link"}
            ],
            "secrets": ["api_key: 1"]
        }),
    );
    let second = write_report(
        &sandbox,
        "second.json",
        &json!({
            "URLS": [
                {"url": "https://example.com/about", "type": "link"},
                {"url": "https://example.com/style.css", "type": "css"}
            ],
            "secrets": ["api_key: 1", "token: 2"]
        }),
    );
    let merged = sandbox.path().join("merged.json");

    sandbox
        .cmd()
        .arg("merge")
        .arg(&first)
        .arg(&second)
        .arg("--output")
        .arg(&merged)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"))
        .stdout(predicate::str::contains("URLS: 3"));

    let report = read_json(&merged);
    let urls: Vec<&str> = report["URLS"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/a.js",
            "https://example.com/about",
            "https://example.com/style.css"
        ]
    );
    // secrets are concatenated, never deduplicated
    assert_eq!(report["secrets"], json!(["api_key: 1", "api_key: 1", "token: 2"]));
    assert!(report.get("alive").is_none());
}

#[test]
fn merge_skips_unparseable_reports() {
    let sandbox = Sandbox::new();
    let good = write_report(
        &sandbox,
        "good.json",
        &json!({"URLS": [{"url": "https://example.com/x", "type": "link"}], "secrets": []}),
    );
    let bad = sandbox.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let merged = sandbox.path().join("merged.json");

    let output = sandbox
        .cmd()
        .arg("merge")
        .arg(&bad)
        .arg(&good)
        .arg("-o")
        .arg(&merged)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed["report"]["URLS"][0]["url"], "https://example.com/x");
    assert_eq!(read_json(&merged)["URLS"].as_array().unwrap().len(), 1);
}

#[test]
fn merge_missing_report_is_not_found() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("merge")
        .arg(sandbox.path().join("nope.json"))
        .arg("--output")
        .arg(sandbox.path().join("merged.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("report not found"));
    assert!(!sandbox.path().join("merged.json").exists());
}
