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
fn test_chrome_command_without_chrome() {
    let logs = tempfile::tempdir().unwrap();
    catche(&logs)
        .args(["chrome", "--chrome-path", "/nonexistent/chrome"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chrome not found"));
}

#[test]
fn test_invalid_setting_is_reported() {
    let logs = tempfile::tempdir().unwrap();
    catche(&logs)
        .args(["chrome", "--chrome-path", "/nonexistent/chrome"])
        .env("MAX_CONCURRENT_IMPORTS", "0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("MAX_CONCURRENT_IMPORTS"));
}
