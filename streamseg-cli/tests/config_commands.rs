//! Integration tests for configuration and language pack commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Generated configuration goes to stdout by default
#[test]
fn test_generate_config_to_stdout() {
    let mut cmd = Command::cargo_bin("streamseg").unwrap();
    cmd.args(["generate-config", "-l", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_buffer_size = 700"))
        .stdout(predicate::str::contains("[tokenizer]"))
        .stdout(predicate::str::contains("language = \"en\""));
}

/// Generated file validates and drives processing
#[test]
fn test_generate_validate_process() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("streamseg.toml");

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["generate-config", "--output"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["validate", "-c"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["process", "-i", "-", "-c"])
        .arg(&config_path)
        .write_stdin("Привет, как твои дела?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Привет, как твои дела?"));
}

/// Unknown keys in a configuration are rejected
#[test]
fn test_validate_rejects_unknown_key() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "context_sise = 10\n").unwrap();

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["validate", "-c"])
        .arg(&config_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}

/// An unknown backend identifier is a configuration error
#[test]
fn test_process_rejects_unknown_backend() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("backend.toml");
    fs::write(&config_path, "[tokenizer]\nbackend = \"spacy\"\n").unwrap();

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["process", "-i", "-", "-c"])
        .arg(&config_path)
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

/// The custom backend needs a callback, which the CLI cannot supply
#[test]
fn test_process_rejects_custom_backend() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[tokenizer]\nbackend = \"custom\"\n").unwrap();

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["process", "-i", "-", "-c"])
        .arg(&config_path)
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create segmenter"));
}

/// A custom pack validates and is picked up from the data directory
#[test]
fn test_custom_language_pack() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("packs");
    fs::create_dir(&data_dir).unwrap();
    let pack_path = data_dir.join("xx.toml");
    fs::write(
        &pack_path,
        r#"
[metadata]
code = "xx"
name = "Test Language"

[terminators]
chars = ["|"]

[abbreviations]
common = ["etc"]
"#,
    )
    .unwrap();

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["validate", "--language-pack"])
        .arg(&pack_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Language code: xx"))
        .stdout(predicate::str::contains("Abbreviations: 1"));

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["process", "-i", "-", "-l", "xx", "--offline", "--data-dir"])
        .arg(&data_dir)
        .write_stdin("Hello there, friend. This is a test without end")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello there,"));
}

/// Invalid packs are reported with the reason
#[test]
fn test_validate_invalid_pack() {
    let temp_dir = TempDir::new().unwrap();
    let pack_path = temp_dir.path().join("broken.toml");
    fs::write(
        &pack_path,
        "[metadata]\ncode = \"xx\"\nname = \"Broken\"\n\n[terminators]\nchars = []\n",
    )
    .unwrap();

    Command::cargo_bin("streamseg")
        .unwrap()
        .args(["validate", "--language-pack"])
        .arg(&pack_path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Language pack is invalid"))
        .stderr(predicate::str::contains("Validation failed"));
}

/// Validate without anything to check is an error
#[test]
fn test_validate_without_arguments() {
    Command::cargo_bin("streamseg")
        .unwrap()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to validate"));
}
