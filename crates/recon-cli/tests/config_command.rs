#![allow(clippy::unwrap_used)]

mod common;

use common::Sandbox;
use predicates::prelude::*;

#[test]
fn config_path_prefers_flag_over_env() {
    let sandbox = Sandbox::new();
    let explicit = sandbox.path().join("explicit.toml");

    sandbox
        .cmd()
        .args(["config", "path", "--config"])
        .arg(&explicit)
        .assert()
        .success()
        .stdout(predicate::str::contains("explicit.toml"));
}

#[test]
fn config_path_reads_env() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recon.toml"));
}

#[test]
fn config_show_merges_file_over_defaults() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[httpx]\ntimeout = 10\n\n[tools.gau]\nargs = [\"--subs\"]\n");

    let output = sandbox
        .cmd()
        .args(["config", "show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["httpx"]["timeout"], 10);
    assert_eq!(config["httpx"]["retries"], 2);
    assert_eq!(config["defaults"]["tool_timeout_secs"], 300);
    assert_eq!(config["tools"]["gau"]["args"][0], "--subs");
}

#[test]
fn config_show_text_is_toml() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "show", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[paths]"))
        .stdout(predicate::str::contains("output_dir = \"outputs\""));
}

#[test]
fn invalid_config_is_a_usage_error() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[httpx\ntimeout = ");

    sandbox
        .cmd()
        .args(["config", "show", "--format", "json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
}
