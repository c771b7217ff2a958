//! Tests for the `drlparse` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use rstest::rstest;

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("drlparse-cli-{}", std::process::id()));
    if let Err(err) = fs::create_dir_all(&dir) {
        panic!("cannot create {}: {err}", dir.display());
    }
    let path = dir.join(name);
    if let Err(err) = fs::write(&path, contents) {
        panic!("cannot write {}: {err}", path.display());
    }
    path
}

fn run(args: &[&str]) -> Output {
    match Command::new(env!("CARGO_BIN_EXE_drlparse")).args(args).output() {
        Ok(output) => output,
        Err(err) => panic!("cannot run drlparse: {err}"),
    }
}

fn path_arg(path: &PathBuf) -> &str {
    path.to_str().unwrap_or_else(|| panic!("non-UTF-8 temp path"))
}

#[rstest]
#[case("clean.drl", "rule \"R\"\nwhen\n    $p : Person()\nthen\nend\n", Some(0))]
#[case("broken.drl", "rule \"R\"\nwhen\n    exists(\n        Person()\nthen\nend\n", Some(1))]
fn exit_status_reflects_errors(
    #[case] name: &str,
    #[case] contents: &str,
    #[case] expected: Option<i32>,
) {
    let path = write_fixture(name, contents);
    let output = run(&[path_arg(&path)]);
    assert_eq!(output.status.code(), expected);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 rules"), "{stdout}");
}

#[test]
fn diagnostics_are_prefixed_with_the_file() {
    let path = write_fixture("prefixed.drl", "rule \"R\"\nwhen\n    not(\nthen\nend\n");
    let output = run(&[path_arg(&path)]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap_or_default();
    assert!(first.starts_with(path_arg(&path)), "{first}");
    assert!(first.contains(": error: Incomplete 'not' pattern"), "{first}");
}

#[test]
fn json_output_is_a_parse_result() {
    let path = write_fixture("json.drl", "package a.b;\nrule \"R\"\nwhen\nthen\nend\n");
    let output = run(&["--json", path_arg(&path)]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap_or_default();
    assert_eq!(value["ast"]["package"]["name"], "a.b");
    assert_eq!(value["ast"]["rules"][0]["name"], "R");
}

#[test]
fn missing_file_exits_with_two() {
    let output = run(&["/nonexistent/drlparse/missing.drl"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!output.stderr.is_empty());
}
