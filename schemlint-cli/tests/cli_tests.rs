//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

/// Build command for the schemlint-cli binary (finds it in target/debug when run via cargo test).
fn schemlint_cli() -> Command {
    cargo_bin_cmd!("schemlint-cli")
}

/// Path to schemlint library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schemlint")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = schemlint_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("circuit"));
}

#[test]
fn test_cli_version() {
    let mut cmd = schemlint_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_clean_file() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("blinker.ckt");

    cmd.arg("check").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("blinker"));
}

#[test]
fn test_cli_check_fail_on_error() {
    let path = fixtures_dir().join("ports_mismatch.ckt");

    let mut cmd = schemlint_cli();
    cmd.arg("check").arg(&path);
    cmd.assert().code(0);

    let mut cmd = schemlint_cli();
    cmd.arg("check").arg(&path).arg("--fail-on").arg("error");
    cmd.assert().code(1);

    let mut cmd = schemlint_cli();
    let clean = fixtures_dir().join("blinker.ckt");
    cmd.arg("check").arg(&clean).arg("--fail-on").arg("error");
    cmd.assert().code(0);
}

#[test]
fn test_cli_check_fail_on_warning() {
    let path = fixtures_dir().join("polarity_bad.ckt");

    let mut cmd = schemlint_cli();
    cmd.arg("check").arg(&path).arg("--fail-on").arg("error");
    cmd.assert().code(0);

    let mut cmd = schemlint_cli();
    cmd.arg("check").arg(&path).arg("--fail-on").arg("warning");
    cmd.assert().code(1);
}

#[test]
fn test_cli_check_json_output() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("ports_mismatch.ckt");

    cmd.arg("check").arg(path).arg("--format").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("{"))
        .stdout(predicate::str::contains("results"))
        .stdout(predicate::str::contains("Protocol mismatch: I2C vs TWI"));
}

#[test]
fn test_cli_check_github_format() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("ports_mismatch.ckt");

    cmd.arg("check").arg(path).arg("--format").arg("github");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("::error file="));
}

#[test]
fn test_cli_check_selection() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("ports_mismatch.ckt");

    // Only the polarity check runs, and this fixture has no polarity issues.
    cmd.arg("check")
        .arg(path)
        .arg("--check")
        .arg("polarity")
        .arg("--fail-on")
        .arg("info");

    cmd.assert().code(0);
}

#[test]
fn test_cli_check_nonexistent_file() {
    let mut cmd = schemlint_cli();

    cmd.arg("check").arg("does_not_exist.ckt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_check_wrong_extension() {
    let mut cmd = schemlint_cli();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");

    cmd.arg("check").arg(path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(".ckt"));
}

#[test]
fn test_cli_project_command() {
    let mut cmd = schemlint_cli();
    let dir = fixtures_dir();

    cmd.arg("project").arg(dir);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("polarity_bad"))
        .stdout(predicate::str::contains("refine"));
}

#[test]
fn test_cli_project_fail_on() {
    let mut cmd = schemlint_cli();
    let dir = fixtures_dir();

    cmd.arg("project")
        .arg(dir)
        .arg("--fail-on")
        .arg("error");

    cmd.assert().code(1);
}

#[test]
fn test_cli_refine_command() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("refine.ckt");

    cmd.arg("refine").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("uc1 may be refined to:"))
        .stdout(predicate::str::contains("ATTiny85"))
        .stdout(predicate::str::contains("ATMega328P"));
}

#[test]
fn test_cli_refine_json() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("refine.ckt");

    cmd.arg("refine").arg(path).arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("candidates"))
        .stdout(predicate::str::contains("requirement"));
}

#[test]
fn test_cli_refine_without_generics() {
    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("blinker.ckt");

    cmd.arg("refine").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("no generic microcontrollers"));
}

#[test]
fn test_cli_refine_custom_catalog() {
    let mut catalog = tempfile::NamedTempFile::new().unwrap();
    write!(
        catalog,
        r#"[{{
            "name": "MegaChip",
            "digital_pins": 128,
            "analog_pins": 32,
            "has_uart": true,
            "has_usart": true,
            "has_usi": true,
            "has_spi": true,
            "has_twi": true
        }}]"#
    )
    .unwrap();

    let mut cmd = schemlint_cli();
    let path = fixtures_dir().join("refine.ckt");

    cmd.arg("refine")
        .arg(path)
        .arg("--catalog")
        .arg(catalog.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MegaChip"));
}

#[test]
fn test_cli_checks_command() {
    let mut cmd = schemlint_cli();

    cmd.arg("checks");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("port_connections"))
        .stdout(predicate::str::contains("polarity"))
        .stdout(predicate::str::contains("refine_mcu"));
}

#[test]
fn test_cli_checks_verbose() {
    let mut cmd = schemlint_cli();

    cmd.arg("checks").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Protocol agreement"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("ports_mismatch.ckt");

    let mut cmd_human = schemlint_cli();
    cmd_human
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("human");
    let human_output = cmd_human.output().unwrap();

    let mut cmd_json = schemlint_cli();
    cmd_json
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        human_output.stdout,
        json_output.stdout,
        "Different formats should produce different output"
    );
}
