use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_commands_and_offline_flag() {
    cargo_bin_cmd!("mylo")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--offline"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("mylo")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_unknown_command_fails() {
    cargo_bin_cmd!("mylo")
        .arg("frobnicate")
        .assert()
        .failure();
}
