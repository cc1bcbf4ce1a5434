//! Smoke tests -- verify the binary runs and the CLI surface is intact.

use assert_cmd::Command;

#[test]
fn test_cli_help() {
    Command::cargo_bin("howfucked")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "Continuous health monitoring for global Internet routing",
        ));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("howfucked")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("howfucked"));
}

#[test]
fn test_serve_subcommand_exists() {
    Command::cargo_bin("howfucked")
        .unwrap()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--bind"));
}

#[test]
fn test_check_subcommand_exists() {
    Command::cargo_bin("howfucked")
        .unwrap()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--json"));
}

#[test]
fn test_bad_config_path_fails() {
    Command::cargo_bin("howfucked")
        .unwrap()
        .args(["--config", "/nonexistent/howfucked.toml", "check"])
        .assert()
        .failure();
}
