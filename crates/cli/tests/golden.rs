//! Golden tests for verifying JSON output format stability
//!
//! Run with: `cargo test --features golden`

#![cfg(feature = "golden")]

use std::process::Command;

use tempfile::TempDir;

#[test]
fn test_sync_dry_run_json() {
    let config_dir = TempDir::new().expect("Failed to create temp dir");
    let site = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir(site.path().join("css")).unwrap();
    std::fs::write(site.path().join("index.html"), "<html></html>").unwrap();
    std::fs::write(site.path().join("css/site.css"), "body{}").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_webotron"))
        .args([
            "sync",
            site.path().to_str().unwrap(),
            "my-site",
            "--dry-run",
            "--json",
        ])
        .env("WEBOTRON_CONFIG_DIR", config_dir.path())
        .output()
        .expect("Failed to execute webotron");

    assert!(output.status.success(), "Command should succeed");

    let mut json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");

    // The root is a temp path and differs on every run
    json.as_object_mut().unwrap().remove("root");

    insta::assert_json_snapshot!("sync_dry_run", json);
}
