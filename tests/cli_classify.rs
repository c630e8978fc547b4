use assert_cmd::prelude::*;
use serde_json::Value;
use std::process::Command;

fn waypoint() -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("waypoint");
    let mut cmd = Command::new(bin);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn classify_prints_verdict_json() {
    let assert = waypoint()
        .args([
            "classify",
            "https://twitter.com/foo",
            "--origin",
            "https://shop.example.com/",
            "--expect",
            "twitter",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["isExternal"], Value::Bool(true));
    assert_eq!(value["registrableDomain"], "twitter.com");
    assert_eq!(value["matchesExpected"], Value::Bool(true));
}

#[test]
fn classify_treats_subdomain_of_origin_as_internal() {
    let assert = waypoint()
        .args([
            "classify",
            "https://WWW.Example.com/x",
            "--origin",
            "https://example.com/",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["isExternal"], Value::Bool(false));
    assert_eq!(value["registrableDomain"], "example.com");
}

#[test]
fn classify_without_origin_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("waypoint.yaml");
    std::fs::write(&config, "log_level: warn\n").unwrap();

    waypoint()
        .args(["--config", config.to_str().unwrap(), "classify", "https://twitter.com/foo"])
        .assert()
        .failure();
}

#[test]
fn unknown_config_file_fails() {
    waypoint()
        .args([
            "--config",
            "does/not/exist.yaml",
            "classify",
            "https://twitter.com/foo",
            "--origin",
            "https://shop.example.com/",
        ])
        .assert()
        .failure();
}

#[test]
fn classify_expect_matches_anywhere_in_the_url() {
    let assert = waypoint()
        .args([
            "classify",
            "https://twitter.com/ShopOfficial",
            "--origin",
            "https://shop.example.com/",
            "--expect",
            "/shopofficial",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["matchesExpected"], Value::Bool(true));

    let help = waypoint().args(["classify", "--help"]).assert().success();
    let text = String::from_utf8(help.get_output().stdout.clone()).expect("utf8 output");
    assert!(text.contains("Fragment the destination URL must contain"));
}
