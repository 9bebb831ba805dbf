#![cfg(unix)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const FIVE_MB: usize = 5 * 1024 * 1024;
const PLATFORMS: [(&str, &str); 3] = [("win-x64", ".exe"), ("linux-x64", ""), ("osx-x64", "")];

fn shipcheck_cmd() -> Command {
    Command::cargo_bin("shipcheck").expect("binary should be built")
}

/// Lays out `<root>/build/<platform>/publish/Product[.exe]` stubs that exit 0,
/// sized `size_for(platform)`.
fn build_tree(root: &Path, size_for: impl Fn(&str) -> usize) {
    for (platform, ext) in PLATFORMS {
        let dir = root.join("build").join(platform).join("publish");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("Product{ext}"));

        let mut script = String::from("#!/bin/sh\nexit 0\n");
        let size = size_for(platform);
        if script.len() < size {
            let pad = size - script.len();
            script.push_str(&"#".repeat(pad - 1));
            script.push('\n');
        }
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

fn verify_cmd(root: &Path, version: &str) -> Command {
    let mut cmd = shipcheck_cmd();
    cmd.arg(version)
        .arg("--product")
        .arg("Product")
        .arg("--build-root")
        .arg(root.join("build"))
        .arg("--output-dir")
        .arg(root.join("assets"))
        .env("SHIPCHECK_LOG", "warn");
    cmd
}

#[test]
fn all_platforms_pass_and_exit_0() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |_| FIVE_MB);

    verify_cmd(dir.path(), "1.0.0")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("win-x64: PASSED"))
        .stdout(predicate::str::contains("linux-x64: PASSED"))
        .stdout(predicate::str::contains("osx-x64: PASSED"))
        .stdout(predicate::str::contains("All 3 platforms verified successfully"));

    for name in [
        "Product_1.0.0_win-x64.exe",
        "Product_1.0.0_linux-x64",
        "Product_1.0.0_osx-x64",
    ] {
        let staged = dir.path().join("assets").join(name);
        assert!(staged.is_file(), "{name} should be staged");
        assert_eq!(fs::metadata(&staged).unwrap().len(), FIVE_MB as u64);
    }
}

#[test]
fn undersized_linux_build_exits_1() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |p| if p == "linux-x64" { 500 } else { FIVE_MB });

    verify_cmd(dir.path(), "1.0.0")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("linux-x64: FAILED - file too small"))
        .stdout(predicate::str::contains("win-x64: PASSED"));
}

#[test]
fn json_output_is_valid() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |_| 4096);

    let output = verify_cmd(dir.path(), "2.0.0")
        .arg("--min-size")
        .arg("1024")
        .arg("--format")
        .arg("json")
        .output()
        .expect("command should run");

    assert_eq!(output.status.code(), Some(0));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");

    assert_eq!(parsed["schema_version"], "0.1.0");
    assert_eq!(parsed["tool"]["name"], "shipcheck-cli");
    assert_eq!(parsed["run"]["version"], "2.0.0");
    assert_eq!(parsed["run"]["failure_policy"], "collect_all");
    assert_eq!(parsed["run"]["smoke_timeout_ms"], 30_000);
    assert_eq!(parsed["outcome"]["exit_code"], 0);
    assert_eq!(parsed["outcome"]["passed"], 3);

    let platforms = parsed["platforms"].as_array().unwrap();
    let ids: Vec<&str> = platforms
        .iter()
        .map(|p| p["platform"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["win-x64", "linux-x64", "osx-x64"]);
    assert_eq!(platforms[0]["staged"]["file_name"], "Product_2.0.0_win-x64.exe");
    assert_eq!(platforms[0]["staged"]["hash"]["algorithm"], "sha256");
    assert_eq!(platforms[0]["validation"]["passed"], true);
    assert_eq!(platforms[0]["validation"]["size_bytes"], 4096);
    assert!(platforms[0]["validation"]["reason"].is_null());
}

#[test]
fn platform_subset_is_respected() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |_| 4096);

    verify_cmd(dir.path(), "1.0.0")
        .arg("--min-size")
        .arg("1024")
        .arg("--platforms")
        .arg("osx-x64")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("osx-x64: PASSED"))
        .stdout(predicate::str::contains("win-x64").not());

    let staged: Vec<_> = fs::read_dir(dir.path().join("assets")).unwrap().collect();
    assert_eq!(staged.len(), 1);
}

#[test]
fn fail_fast_marks_later_platforms_skipped() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |p| if p == "win-x64" { 10 } else { 4096 });

    verify_cmd(dir.path(), "1.0.0")
        .arg("--min-size")
        .arg("1024")
        .arg("--fail-fast")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("win-x64: FAILED - file too small"))
        .stdout(predicate::str::contains("linux-x64: SKIPPED"))
        .stdout(predicate::str::contains("osx-x64: SKIPPED"));
}

#[test]
fn report_can_be_written_to_file() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |_| 4096);
    let out = dir.path().join("report.txt");

    verify_cmd(dir.path(), "1.0.0")
        .arg("--min-size")
        .arg("1024")
        .arg("--out")
        .arg(&out)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("Verifying Product version 1.0.0"));
}

#[test]
fn missing_build_root_fails_every_platform() {
    let dir = TempDir::new().unwrap();

    verify_cmd(dir.path(), "1.0.0")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn unknown_platform_is_a_usage_error() {
    shipcheck_cmd()
        .arg("--platforms")
        .arg("linux-arm64")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("linux-arm64"));
}

#[test]
fn invalid_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path(), |_| 4096);

    verify_cmd(dir.path(), "../1.0.0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid version"));

    assert!(!dir.path().join("assets").exists());
}
