use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_catche_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("catche")
}

/// Command with logs redirected to a scratch directory
fn catche(log_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(get_catche_bin());
    cmd.env("LOG_DIR", log_dir.path())
        .env_remove("CATCHE_PASSWORD")
        .env_remove("CHROME_PATH");
    cmd
}

#[test]
fn test_completion_bash() {
    let logs = tempfile::tempdir().unwrap();
    catche(&logs)
        .args(["completion", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_catche()"));
}

#[test]
fn test_completion_zsh() {
    let logs = tempfile::tempdir().unwrap();
    catche(&logs)
        .args(["completion", "--shell", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef catche"));
}

#[test]
fn test_completion_requires_shell() {
    let logs = tempfile::tempdir().unwrap();
    catche(&logs).arg("completion").assert().failure();
}
