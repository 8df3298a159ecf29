#![allow(clippy::unwrap_used)]
#![cfg(unix)]

mod common;

use common::Sandbox;
use predicates::prelude::*;

#[test]
fn tools_reports_configured_and_missing() {
    let sandbox = Sandbox::new();
    let gau = sandbox.fake_tool("gau", "");
    sandbox.write_config(&format!(
        "[tools.gau]\npath = '{}'\n\n[tools.naabu]\npath = '{}'\n",
        gau.display(),
        sandbox.path().join("missing-naabu").display()
    ));

    let output = sandbox
        .cmd()
        .args(["tools", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 20);

    let entry = |name: &str| {
        entries
            .iter()
            .find(|e| e["tool"] == name)
            .cloned()
            .unwrap()
    };
    assert_eq!(entry("gau")["installed"], true);
    assert_eq!(entry("gau")["path"], gau.display().to_string());
    assert_eq!(entry("naabu")["installed"], false);
    assert_eq!(entry("subfinder")["installed"], false);
}

#[test]
fn tools_text_summary() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["tools", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not installed"))
        .stdout(predicate::str::contains("0/20 tools available"));
}
