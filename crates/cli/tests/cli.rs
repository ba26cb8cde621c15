//! Command-line tests that run the built binary without network access

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run webotron with an isolated config directory
fn run(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_webotron"))
        .args(args)
        .env("WEBOTRON_CONFIG_DIR", config_dir)
        .env_remove("WEBOTRON_PROFILE")
        .env_remove("WEBOTRON_REGION")
        .env_remove("WEBOTRON_ENDPOINT_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute webotron")
}

fn write_site(root: &Path) {
    std::fs::create_dir_all(root.join("css")).unwrap();
    std::fs::create_dir_all(root.join("img/icons")).unwrap();
    std::fs::write(root.join("index.html"), "<html></html>").unwrap();
    std::fs::write(root.join("error.html"), "<html>oops</html>").unwrap();
    std::fs::write(root.join("css/site.css"), "body{}").unwrap();
    std::fs::write(root.join("img/icons/logo.png"), [0u8; 4]).unwrap();
    std::fs::write(root.join("notes.unknownext"), "hi").unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    let config = TempDir::new().unwrap();
    let output = run(config.path(), &["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["list-buckets", "list-bucket-objects", "setup-bucket", "sync"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in help");
    }
    assert!(stdout.contains("--profile"));
}

#[test]
fn test_sync_missing_path_is_usage_error() {
    let config = TempDir::new().unwrap();
    let site = TempDir::new().unwrap();
    let missing = site.path().join("does-not-exist");

    let output = run(config.path(), &["sync", missing.to_str().unwrap(), "my-site"]);
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}

#[test]
fn test_sync_dry_run_json_lists_relative_keys() {
    let config = TempDir::new().unwrap();
    let site = TempDir::new().unwrap();
    write_site(site.path());

    let output = run(
        config.path(),
        &[
            "sync",
            site.path().to_str().unwrap(),
            "my-site",
            "--dry-run",
            "--json",
        ],
    );
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    assert_eq!(json["bucket"], "my-site");
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["uploaded"], 0);

    let files = json["files"].as_array().unwrap();
    let keys: Vec<&str> = files.iter().map(|f| f["key"].as_str().unwrap()).collect();
    assert_eq!(
        keys,
        vec![
            "css/site.css",
            "error.html",
            "img/icons/logo.png",
            "index.html",
            "notes.unknownext",
        ]
    );

    let content_type = |key: &str| {
        files
            .iter()
            .find(|f| f["key"] == key)
            .map(|f| f["content_type"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(content_type("index.html"), "text/html");
    assert_eq!(content_type("img/icons/logo.png"), "image/png");
    assert_eq!(content_type("notes.unknownext"), "text/plain");
}

#[test]
fn test_sync_dry_run_empty_dir() {
    let config = TempDir::new().unwrap();
    let site = TempDir::new().unwrap();

    let output = run(
        config.path(),
        &["sync", site.path().to_str().unwrap(), "my-site", "-n", "--json"],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files"], serde_json::json!([]));
    assert_eq!(json["total_bytes"], 0);
}

#[test]
fn test_sync_dry_run_human_output() {
    let config = TempDir::new().unwrap();
    let site = TempDir::new().unwrap();
    write_site(site.path());

    let output = run(
        config.path(),
        &[
            "sync",
            site.path().to_str().unwrap(),
            "my-site",
            "--dry-run",
            "--no-color",
        ],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would upload 5 object(s):"));
    assert!(stdout.contains("+ index.html (text/html"));
}

#[test]
fn test_malformed_config_is_reported() {
    let config = TempDir::new().unwrap();
    std::fs::write(config.path().join("config.toml"), "[aws\nprofile = ").unwrap();

    let output = run(config.path(), &["list-buckets"]);
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"), "stderr: {stderr}");
}

#[test]
fn test_invalid_endpoint_flag_is_reported() {
    let config = TempDir::new().unwrap();

    let output = run(
        config.path(),
        &["list-buckets", "--endpoint-url", "not a url", "--json"],
    );
    assert_eq!(output.status.code(), Some(2));

    let stderr: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(stderr["error"].as_str().unwrap().contains("endpoint_url"));
}

#[test]
fn test_completions() {
    let config = TempDir::new().unwrap();
    let output = run(config.path(), &["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("webotron"));
}
