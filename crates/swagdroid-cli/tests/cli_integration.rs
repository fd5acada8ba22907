use assert_cmd::Command;
use predicates::prelude::*;

const CREDENTIAL_VARS: [&str; 4] = ["STANDARD_USER", "PROBLEM_USER", "LOCKED_OUT_USER", "PASSWORD"];

fn swagdroid() -> Command {
    let mut cmd = Command::cargo_bin("swagdroid").unwrap();
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("SWAGDROID_SERVER")
        .env_remove("SWAGDROID_CONFIG")
        .env_remove("SWAGDROID_LOG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn with_credentials(cmd: &mut Command) -> &mut Command {
    cmd.env("STANDARD_USER", "standard_user")
        .env("PROBLEM_USER", "problem_user")
        .env("LOCKED_OUT_USER", "locked_out_user")
        .env("PASSWORD", "secret_sauce")
}

#[test]
fn test_help_exits_zero() {
    swagdroid()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("swagdroid"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_list_shows_every_scenario() {
    swagdroid()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "can_authenticate_with_standard_user_and_valid_password",
        ))
        .stdout(predicate::str::contains("cant_authenticate_with_empty_password"))
        .stdout(predicate::str::contains("credentials_are_filled_by_problem_user_autofill"));
}

#[test]
fn test_list_json_filtered_by_tag() {
    let assert = swagdroid()
        .args(["--format", "json", "list", "--tag", "negative"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let entries: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e["tag"] == "negative"));
}

#[test]
fn test_run_without_credentials_names_missing_variables() {
    swagdroid()
        .env("STANDARD_USER", "standard_user")
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PROBLEM_USER"))
        .stderr(predicate::str::contains("LOCKED_OUT_USER"))
        .stderr(predicate::str::contains("PASSWORD"))
        .stderr(predicate::str::contains("STANDARD_USER,").not());
}

#[test]
fn test_run_unknown_scenario_is_config_error() {
    let mut cmd = swagdroid();
    with_credentials(&mut cmd)
        .args(["run", "--scenario", "no_such_scenario"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown scenario 'no_such_scenario'"));
}

#[test]
fn test_run_with_missing_config_file_is_config_error() {
    let mut cmd = swagdroid();
    with_credentials(&mut cmd)
        .args(["run", "--config", "/nonexistent/swagdroid/config.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/nonexistent/swagdroid/config.json"));
}

#[test]
fn test_invalid_tag_is_rejected() {
    swagdroid()
        .args(["list", "--tag", "smoke"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("smoke"));
}

#[test]
fn test_completions_bash() {
    swagdroid()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("swagdroid"));
}
