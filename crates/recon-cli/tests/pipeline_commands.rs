//! End-to-end runs of the pipeline commands against fake tool scripts.

#![allow(clippy::unwrap_used)]
#![cfg(unix)]

mod common;

use common::{Sandbox, read_json};
use predicates::prelude::*;
use serde_json::json;

fn configure(sandbox: &Sandbox, tools: &[(&str, &str)], extra: &str) {
    let mut config = String::from(extra);
    for (name, stdout) in tools {
        let path = sandbox.fake_tool(name, stdout);
        config.push_str(&format!("\n[tools.{name}]\npath = '{}'\n", path.display()));
    }
    sandbox.write_config(&config);
}

#[test]
fn discover_merges_relative_and_absolute_urls() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[
            ("gau", r#"{"url":"/a.js"}"#),
            ("hakrawler", r#"{"URL":"https://example.com/a.js"}"#),
            ("jsrecon", "/api/users\nAKIA_TEST_KEY"),
        ],
        "",
    );
    let out = sandbox.path().join("discovery.json");

    sandbox
        .cmd()
        .args(["discover", "https://example.com/landing", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\""));

    let report = read_json(&out);
    assert_eq!(
        report["URLS"],
        json!([
            {"url": "https://example.com/a.js", "type": "javascript"},
            {"url": "https://example.com/api/users", "type": "link"}
        ])
    );
    assert_eq!(report["secrets"], json!(["AKIA_TEST_KEY"]));
    assert_eq!(report["waybackurls"], json!([]));
}

#[test]
fn discover_skip_leaves_tool_out() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[
            ("gau", r#"{"url":"https://example.com/from-gau"}"#),
            ("waybackurls", "https://example.com/old"),
        ],
        "",
    );
    let out = sandbox.path().join("discovery.json");

    sandbox
        .cmd()
        .args(["discover", "example.com", "--skip", "gau", "--skip", "waybackurls", "-o"])
        .arg(&out)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("URLS: 0"));

    let report = read_json(&out);
    assert_eq!(report["URLS"], json!([]));
    assert!(report.get("waybackurls").is_none());
}

#[test]
fn discover_writes_under_output_dir_by_default() {
    let sandbox = Sandbox::new();
    let reports = sandbox.path().join("reports");
    configure(
        &sandbox,
        &[],
        &format!("[paths]\noutput_dir = '{}'\n", reports.display()),
    );

    sandbox
        .cmd()
        .args(["discover", "example.com", "--format", "json"])
        .assert()
        .success();

    let files: Vec<String> = std::fs::read_dir(&reports)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("example_com_discovery_"));
    assert!(files[0].ends_with(".json"));
}

#[test]
fn discover_rejects_unusable_domain() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["discover", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid domain"));
}

#[test]
fn subdomains_buckets_checked_hosts() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[
            ("whois", "Registrar: Test Registrar\nName Server: NS1\nName Server: NS2"),
            ("subfinder", "api.example.com"),
            (
                "httpx",
                concat!(
                    r#"{"url":"https://api.example.com","status_code":200,"webserver":"nginx"}"#,
                    "\n",
                    r#"{"url":"http://api.example.com","status_code":404}"#
                ),
            ),
        ],
        "",
    );
    let out = sandbox.path().join("scan.json");

    sandbox
        .cmd()
        .args(["subdomains", "example.com", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out);
    assert_eq!(report["whois"]["Registrar"], "Test Registrar");
    assert_eq!(report["whois"]["Name Server"], json!(["NS1", "NS2"]));

    let alive = report["alive"].as_array().unwrap();
    assert_eq!(alive.len(), 1);
    assert_eq!(alive[0]["url"], "https://api.example.com");
    assert_eq!(alive[0]["server"], "nginx");
    assert_eq!(report["dead"].as_array().unwrap().len(), 1);
    assert_eq!(report["check"], json!([]));
}

#[test]
fn ports_fingerprints_open_ports() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[
            (
                "naabu",
                "{\"host\":\"10.0.0.1\",\"port\":443}\n{\"host\":\"10.0.0.1\",\"port\":80}",
            ),
            (
                "httpx",
                r#"{"port":"80","status_code":200,"title":"Home","webserver":"Apache"}"#,
            ),
        ],
        "",
    );
    let out = sandbox.path().join("ports.json");

    sandbox
        .cmd()
        .args(["ports", "10.0.0.1", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out);
    assert_eq!(report["target"], "10.0.0.1");
    assert_eq!(report["open_ports"], json!([80, 443]));
    assert_eq!(report["http_tech"]["80"]["title"], "Home");
    assert_eq!(report["http_tech"]["80"]["server"], "Apache");
    assert!(report["http_tech"].get("443").is_none());
}

#[test]
fn missing_tools_still_produce_a_report() {
    let sandbox = Sandbox::new();
    let out = sandbox.path().join("ports.json");

    sandbox
        .cmd()
        .args(["ports", "example.com", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out);
    assert_eq!(report["open_ports"], json!([]));
    assert_eq!(report["http_tech"], json!({}));
}

#[test]
fn ports_deep_scan_reports_services_and_os() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[
            ("naabu", "{\"host\":\"10.0.0.1\",\"port\":22}"),
            (
                "nmap",
                r#"<?xml version="1.0"?>
<nmaprun><host><ports>
<port protocol="tcp" portid="22"><state state="open"/><service name="ssh" product="OpenSSH" version="9.2p1"/></port>
</ports><os><osmatch name="Linux 5.0 - 5.14" accuracy="98"/></os></host></nmaprun>"#,
            ),
        ],
        "",
    );
    let out = sandbox.path().join("ports.json");

    sandbox
        .cmd()
        .args(["ports", "10.0.0.1", "-o"])
        .arg(&out)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("services: 1"));

    let report = read_json(&out);
    assert_eq!(report["services"][0]["port"], 22);
    assert_eq!(report["services"][0]["product"], "OpenSSH");
    assert_eq!(report["os"]["name"], "Linux 5.0 - 5.14");
}

#[test]
fn secrets_reports_trufflehog_findings() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[(
            "trufflehog",
            concat!(
                r#"{"DetectorName":"AWS","Raw":"AKIAEXAMPLE","Verified":false}"#,
                "\n",
                "🐷🔑🐷  TruffleHog. Unearth your secrets. 🐷🔑🐷"
            ),
        )],
        "",
    );
    let out = sandbox.path().join("secrets.json");

    sandbox
        .cmd()
        .args(["secrets", "https://github.com/acme/app", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out);
    assert_eq!(report["target"], "https://github.com/acme/app");
    assert_eq!(report["secrets"], json!(["AWS: AKIAEXAMPLE"]));
}

#[test]
fn vulns_collects_nuclei_findings() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[(
            "nuclei",
            r#"{"template-id":"git-config","info":{"name":"Git Config","severity":"medium"},"matched-at":"https://example.com/.git/config"}"#,
        )],
        "",
    );
    let out = sandbox.path().join("vulns.json");

    sandbox
        .cmd()
        .args(["vulns", "example.com", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out);
    assert_eq!(report["target"], "https://example.com");
    let findings = report["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["id"], "git-config");
    assert_eq!(findings[0]["severity"], "medium");
}

#[test]
fn waf_reports_detected_firewall() {
    let sandbox = Sandbox::new();
    configure(
        &sandbox,
        &[(
            "wafw00f",
            r#"[{"url":"https://example.com","detected":true,"firewall":"Cloudflare","manufacturer":"Cloudflare Inc."}]"#,
        )],
        "",
    );
    let out = sandbox.path().join("waf.json");

    sandbox
        .cmd()
        .args(["waf", "https://example.com", "--format", "json", "-o"])
        .arg(&out)
        .assert()
        .success();

    let report = read_json(&out);
    assert_eq!(report["waf"]["detected"], true);
    assert_eq!(report["waf"]["firewalls"], json!(["Cloudflare (Cloudflare Inc.)"]));
}
