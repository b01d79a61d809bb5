//! Integration tests that run the compiled `runcfg` binary against fixtures

use assert_cmd::Command;
use predicates::prelude::*;
use runcfg_test_utils::fixtures;
use runcfg_test_utils::project::TestProject;

/// Get a Command for the runcfg binary
fn runcfg_cmd() -> Command {
    let mut cmd = Command::cargo_bin("runcfg").expect("Failed to find runcfg binary");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn fixture(name: &str) -> String {
    fixtures::config(name).display().to_string()
}

#[test]
fn test_help_lists_commands() {
    runcfg_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("tests"));
}

#[test]
fn test_no_command_prints_hint() {
    runcfg_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("runcfg --help"));
}

// ============================================================================
// show
// ============================================================================

#[test]
fn test_show_prints_json_model() {
    let output = runcfg_cmd()
        .args(["show", &fixture("configuration.xml")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["phpunit"]["columns"], 80);
    assert_eq!(value["groups"]["include"][0], "name");
}

#[test]
fn test_show_single_section() {
    let output = runcfg_cmd()
        .args(["show", &fixture("configuration.xml"), "--section", "php"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ini"]["foo"], "bar");
    assert!(value.get("phpunit").is_none());
}

#[test]
fn test_show_unknown_section_fails() {
    runcfg_cmd()
        .args(["show", &fixture("configuration.xml"), "-s", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown section 'bogus'"));
}

#[test]
fn test_missing_configuration_fails() {
    runcfg_cmd()
        .args(["show", "/definitely/not/here/phpunit.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read configuration file"));
}

#[test]
fn test_cycle_is_reported() {
    runcfg_cmd()
        .args(["suites", &fixture("cycle_a.xml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic inclusion"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_valid_document() {
    runcfg_cmd()
        .args(["validate", &fixture("configuration.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn test_validate_invalid_document_exits_one() {
    runcfg_cmd()
        .args(["validate", &fixture("configuration.colors.invalid.xml")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("/phpunit/@colors"))
        .stderr(predicate::str::contains("1 validation error(s)"));
}

#[test]
fn test_invalid_document_still_shows_with_warning() {
    runcfg_cmd()
        .args(["show", &fixture("configuration.colors.invalid.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"colors\": \"never\""))
        .stderr(predicate::str::contains("warning"));
}

// ============================================================================
// suites / tests
// ============================================================================

#[test]
fn test_suites_lists_names() {
    runcfg_cmd()
        .args(["suites", &fixture("configuration.suites.xml")])
        .assert()
        .success()
        .stdout("Suite One\nSuite Two\n");
}

#[test]
fn test_suites_without_suites() {
    runcfg_cmd()
        .args(["suites", &fixture("configuration_empty.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No test suites configured"));
}

#[test]
fn test_tests_lists_files_per_suite() {
    runcfg_cmd()
        .args(["tests", &fixture("configuration.suites.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Suite One\t"))
        .stdout(predicate::str::contains("unit/OtherTest.php"))
        .stdout(predicate::str::contains("Suite Two\t"))
        .stdout(predicate::str::contains("Missing.php").not());
}

#[test]
fn test_tests_filtered_by_suite() {
    runcfg_cmd()
        .args([
            "tests",
            &fixture("configuration.suites.xml"),
            "--testsuite",
            "Suite Two",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ExampleTest.php"))
        .stdout(predicate::str::contains("Suite One").not());
}

#[test]
fn test_tests_unknown_suite_fails() {
    runcfg_cmd()
        .args(["tests", &fixture("configuration.suites.xml"), "--testsuite", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No test suite named 'nope'"));
}

// ============================================================================
// env
// ============================================================================

#[test]
fn test_env_applies_php_section() {
    let output = runcfg_cmd()
        .args(["env", &fixture("configuration.xml"), "--const", "TEST_FILES_PATH=/srv/files/"])
        .env_remove("foo")
        .env("foo_force", "from-shell")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ini"]["highlight.string"], "/srv/files/");
    assert_eq!(value["env"]["foo"], "1");
    assert_eq!(value["env"]["foo_force"], "forced");
    assert_eq!(value["osEnv"]["foo_force"], "forced");
    assert_eq!(value["const"]["BAR"], true);
}

#[test]
fn test_env_keeps_shell_values_when_not_forced() {
    let output = runcfg_cmd()
        .args(["env", &fixture("configuration.xml")])
        .env("foo", "from-shell")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["env"]["foo"], "from-shell");
}

#[test]
fn test_include_path_flag_resolves_component_files() {
    let project = TestProject::new();
    project.file("vendor/listeners/AuditListener.php", "<?php\n");
    let config = project.config(
        "phpunit.xml",
        r#"<phpunit><listeners>
            <listener class="AuditListener" file="AuditListener.php"/>
        </listeners></phpunit>"#,
    );

    let output = runcfg_cmd()
        .current_dir(project.root())
        .args(["show", "phpunit.xml", "-s", "listeners", "--include-path", "vendor/listeners"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(config.exists());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let file = value[0]["file"].as_str().unwrap();
    assert!(file.ends_with("vendor/listeners/AuditListener.php"), "{file}");
}
