#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A command isolated from the user's config and pointed at a closed port.
fn scripture_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("scripture"));
    cmd.env("SCRIPTURE_CONFIG_DIR", config_dir.path())
        .env("SCRIPTURE_BASE_URL", "http://127.0.0.1:9/v1")
        .env("SCRIPTURE_RETRY_DELAY_MS", "1")
        .env_remove("SCRIPTURE_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_translations_come_from_the_catalog() {
    let temp = TempDir::new().unwrap();
    scripture_cmd(&temp)
        .arg("translations")
        .assert()
        .success()
        .stdout(predicate::str::contains("KJV"))
        .stdout(predicate::str::contains("Westminster Leningrad Codex"))
        .stdout(predicate::str::contains("heb rtl"));
}

#[test]
fn test_languages_group_translations() {
    let temp = TempDir::new().unwrap();
    scripture_cmd(&temp)
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Spanish"))
        .stdout(predicate::str::contains("KJV, ASV, WEB, BSB, FBV"));
}

#[test]
fn test_config_set_then_get() {
    let temp = TempDir::new().unwrap();

    scripture_cmd(&temp)
        .args(["config", "default-translation", "WEB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default-translation set to WEB"));

    let saved = fs::read_to_string(temp.path().join("config.json")).unwrap();
    assert!(saved.contains("\"default_translation\": \"WEB\""));

    scripture_cmd(&temp)
        .args(["config", "default-translation"])
        .assert()
        .success()
        .stdout("WEB\n");

    scripture_cmd(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("max-attempts"))
        .stdout(predicate::str::contains("= WEB"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let temp = TempDir::new().unwrap();
    scripture_cmd(&temp)
        .args(["config", "colour", "red"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown config key: colour"));
    assert!(!temp.path().join("config.json").exists());
}

#[test]
fn test_corrupt_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.json"), "{ not json").unwrap();
    scripture_cmd(&temp)
        .arg("books")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Serialization error"));
}

#[test]
fn test_unreachable_remote_degrades_gracefully() {
    let temp = TempDir::new().unwrap();
    for args in [
        vec!["verse", "JHN.3.16"],
        vec!["books"],
        vec!["read", "PSA.23", "--verses"],
        vec!["random", "-t", "web"],
    ] {
        scripture_cmd(&temp)
            .args(&args)
            .assert()
            .success()
            .stdout(predicate::str::contains("Content unavailable"));
    }
}

#[test]
fn test_blank_search_needs_no_network() {
    let temp = TempDir::new().unwrap();
    scripture_cmd(&temp)
        .args(["search", " "])
        .assert()
        .success()
        .stdout(predicate::str::contains("No verses found"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    scripture_cmd(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "scripture ",
            env!("CARGO_PKG_VERSION")
        )));
}
