use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn htmlint() -> Command {
    Command::cargo_bin("htmlint").unwrap()
}

fn json_output(args: &[&str]) -> serde_json::Value {
    let output = htmlint().args(args).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_valid_fixtures_pass() {
    htmlint()
        .arg("tests/fixtures/valid")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"))
        .stdout(predicate::str::contains("2 files checked"));
}

#[test]
fn test_invalid_fixtures_fail_with_text_report() {
    htmlint()
        .arg("tests/fixtures/invalid")
        .assert()
        .failure()
        .stdout(predicate::str::contains("landing.html:8:7"))
        .stdout(predicate::str::contains("[no-inline-event-handlers]"))
        .stdout(predicate::str::contains("Found 1 error, 6 warnings in 1 file"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn test_validate_subcommand_matches_default() {
    htmlint()
        .args(["validate", "tests/fixtures/valid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_format_json() {
    let json = json_output(&["tests/fixtures/invalid", "--format", "json"]);

    assert_eq!(json["files_checked"], 1);
    assert_eq!(json["summary"]["errors"], 1);
    assert_eq!(json["summary"]["warnings"], 6);

    let rules: Vec<&str> = json["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["rule"].as_str().unwrap())
        .collect();
    assert_eq!(
        rules,
        vec![
            "no-inline-event-handlers",
            "require-canonical",
            "meta-description",
            "no-stacked-br",
            "figure-caption",
            "img-dimensions",
            "img-dimensions",
        ]
    );
    assert_eq!(json["diagnostics"][0]["file"], "landing.html");
    assert_eq!(json["diagnostics"][0]["line"], 8);
}

#[test]
fn test_format_json_has_no_banner() {
    let output = htmlint()
        .args(["tests/fixtures/valid", "--format", "json"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.trim_start().starts_with('{'));
    assert!(!stdout.contains("Validating:"));
}

#[test]
fn test_format_sarif() {
    let json = json_output(&["tests/fixtures/invalid", "--format", "sarif"]);

    assert_eq!(json["version"], "2.1.0");
    assert!(json["$schema"].as_str().unwrap().contains("sarif-schema-2.1.0"));

    let driver = &json["runs"][0]["tool"]["driver"];
    assert_eq!(driver["name"], "htmlint");
    assert_eq!(driver["rules"].as_array().unwrap().len(), 6);

    let results = json["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 7);
    assert_eq!(results[0]["level"], "error");
    assert_eq!(
        results[0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "landing.html"
    );
}

#[test]
fn test_format_text_is_default() {
    htmlint()
        .arg("tests/fixtures/valid")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\"").not());
}

#[test]
fn test_strict_fails_on_warnings() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("frag.html"), "<img src=a.png>").unwrap();

    htmlint().arg(temp.path()).assert().success();
    htmlint().arg(temp.path()).arg("--strict").assert().failure();
}

#[test]
fn test_verbose_shows_suggestions() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("frag.html"), "<img src=a.png>").unwrap();

    htmlint()
        .arg(temp.path())
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("help:"));
}

#[test]
fn test_config_file_disables_rules() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("page.html"),
        "<button onclick=\"go()\">Go</button>",
    )
    .unwrap();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[rules]\nevent_handlers = false\n").unwrap();

    htmlint().arg(temp.path()).assert().failure();
    htmlint()
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn test_config_discovered_in_root() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("page.html"),
        "<body onload=\"init()\"></body>",
    )
    .unwrap();
    fs::write(
        temp.path().join(".htmlint.toml"),
        "[event_handlers]\nallow = [\"onload\"]\n",
    )
    .unwrap();

    htmlint().arg(temp.path()).assert().success();
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "[meta_description]\nmin_length = 300\n").unwrap();

    htmlint()
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_length"));
}

#[test]
fn test_init_writes_default_config() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join(".htmlint.toml");

    htmlint()
        .arg("init")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("[meta_description]"));
    assert!(content.contains("min_length = 50"));

    // refuses to overwrite
    htmlint().arg("init").arg(&output).assert().failure();
}

#[test]
fn test_rules_subcommand_lists_catalogue() {
    htmlint()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("no-stacked-br"))
        .stdout(predicate::str::contains("img-dimensions"))
        .stdout(predicate::str::contains("dom:ready"))
        .stdout(predicate::str::contains("6 rules"));
}

#[test]
fn test_help_shows_format_option() {
    htmlint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"));
}
