//! Integration tests for status and config commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CREDENTIAL_VARS: &[&str] = &[
    "GEMINI_API_KEY",
    "GOOGLE_API_KEY",
    "GROQ_API_KEY",
    "DEEPSEEK_API_KEY",
];

fn studydesk_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("studydesk").unwrap();
    cmd.env("STUDYDESK_CONFIG", config_dir.path().join("config.yml"));
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_status_lists_disabled_providers() {
    let config_dir = TempDir::new().unwrap();

    studydesk_cmd(&config_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini"))
        .stdout(predicate::str::contains("disabled"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_status_picks_up_env_credentials() {
    let config_dir = TempDir::new().unwrap();

    let output = studydesk_cmd(&config_dir)
        .env("GROQ_API_KEY", "gsk-test")
        .args(["--format", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let providers = json["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 3);

    let groq = providers
        .iter()
        .find(|p| p["provider"] == "groq")
        .unwrap();
    assert_eq!(groq["enabled"], true);
    let gemini = providers
        .iter()
        .find(|p| p["provider"] == "gemini")
        .unwrap();
    assert_eq!(gemini["enabled"], false);
    assert_eq!(json["routing"]["word_threshold"], 15);
}

#[test]
fn test_subject_flag_overrides_config() {
    let config_dir = TempDir::new().unwrap();

    let output = studydesk_cmd(&config_dir)
        .args(["--subject", "law", "--format", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["subject"], "law");
}

#[test]
fn test_unknown_subject_rejected() {
    let config_dir = TempDir::new().unwrap();

    studydesk_cmd(&config_dir)
        .args(["--subject", "astrology", "status"])
        .assert()
        .failure();
}

#[test]
fn test_config_path_honors_env() {
    let config_dir = TempDir::new().unwrap();

    studydesk_cmd(&config_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yml"));
}

#[test]
fn test_config_init_writes_file_once() {
    let config_dir = TempDir::new().unwrap();
    let path = config_dir.path().join("config.yml");

    studydesk_cmd(&config_dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("routing"));
    assert!(content.contains("cascade"));
    assert!(!content.contains("api_key"));

    studydesk_cmd(&config_dir)
        .args(["config", "init"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));

    studydesk_cmd(&config_dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_does_not_print_env_credentials() {
    let config_dir = TempDir::new().unwrap();

    studydesk_cmd(&config_dir)
        .env("GEMINI_API_KEY", "secret-key-value")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("subject"))
        .stdout(predicate::str::contains("secret-key-value").not());
}

#[test]
fn test_invalid_config_file_is_reported() {
    let config_dir = TempDir::new().unwrap();
    fs::write(config_dir.path().join("config.yml"), "routing: [not, a, map]\n").unwrap();

    studydesk_cmd(&config_dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_models_requires_gemini() {
    let config_dir = TempDir::new().unwrap();

    studydesk_cmd(&config_dir)
        .arg("models")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_config_init_force_replaces_broken_file() {
    let config_dir = TempDir::new().unwrap();
    let path = config_dir.path().join("config.yml");
    fs::write(&path, "this: [is: not valid yaml\n").unwrap();

    studydesk_cmd(&config_dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML"));

    studydesk_cmd(&config_dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yml"));

    studydesk_cmd(&config_dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("routing"));

    studydesk_cmd(&config_dir)
        .arg("status")
        .assert()
        .success();
}
