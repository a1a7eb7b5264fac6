use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("mylo")
        .env("MYLO_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("mylo")
        .env("MYLO_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("backend = \"firebase\""));
    assert!(contents.contains("# auth_base_url ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("mylo")
        .env("MYLO_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_firebase_backend_without_api_key_fails() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("mylo")
        .env("MYLO_HOME", dir.path())
        .env_remove("MYLO_FIREBASE_API_KEY")
        .env_remove("MYLO_FIREBASE_PROJECT")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"))
        .stderr(predicate::str::contains("--offline"));
}

#[test]
fn test_offline_requires_terminal() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("mylo")
        .env("MYLO_HOME", dir.path())
        .arg("--offline")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));

    assert!(dir.path().join("logs").join("mylo.log").exists());
}
