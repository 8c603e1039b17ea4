//! Integration tests for the drapeau host binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const VESTI: &str = r#"
name = "vesti"
description = "A preprocessor for LaTeX"

[main_arg]
name = "FILES"
description = "input files"

[[flags]]
long = "count"
short = "c"
kind = "i32"
default = 0
description = "how many"

[[flags]]
long = "name"
kind = "string"
default = "x"
description = "who"

[[subcommands]]
name = "build"
description = "build the document"
main_arg = { name = "FILE", description = "input" }
flags = [ { long = "ids", kind = "u32", list = true, description = "ids" } ]
"#;

fn manifest(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("drapeau.toml");
    fs::write(&path, content).unwrap();
    path
}

fn drapeau() -> Command {
    let mut cmd = Command::cargo_bin("drapeau-cli").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("DRAPEAU_LOG")
        .env_remove("DRAPEAU_RAW")
        .env_remove("DRAPEAU_MANIFEST");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn test_global_flags_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    let output = drapeau()
        .arg(&path)
        .args(["--", "--count", "42", "--name", "hello", "main.ves"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output.stdout);
    assert_eq!(report["program"], "vesti");
    assert_eq!(report["global"]["flags"]["count"], 42);
    assert_eq!(report["global"]["flags"]["name"], "hello");
    assert_eq!(report["global"]["args"], json!(["main.ves"]));
    assert_eq!(report["subcommand"], Value::Null);
}

#[test]
fn test_subcommand_values_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    let output = drapeau()
        .arg(&path)
        .args(["--", "build", "--ids", "1", "2", "3", "--", "x"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output.stdout);
    assert_eq!(report["subcommand"]["name"], "build");
    assert_eq!(report["subcommand"]["flags"]["ids"], json!([1, 2, 3]));
    assert_eq!(report["subcommand"]["args"], json!(["x"]));
    assert_eq!(report["global"]["flags"]["count"], 0);
}

#[test]
fn test_raw_output_is_compact() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    drapeau()
        .arg("--raw")
        .arg(&path)
        .args(["--", "-c", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"));
}

#[test]
fn test_unknown_flag_fails_with_help() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    drapeau()
        .arg(&path)
        .args(["--", "--nope"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error: Cannot find an appropriate flag"))
        .stderr(predicate::str::contains("Usage: vesti [SUBCOMMANDS] [ARGS] [FLAGS]"));
}

#[test]
fn test_short_cluster_fails() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    drapeau()
        .arg(&path)
        .args(["--", "-ab"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Long flags must start with `--`, not `-`"));
}

#[test]
fn test_invalid_number_fails() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    drapeau()
        .arg(&path)
        .args(["--", "--count", "many"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid number or overflowed number is given"));
}

#[test]
fn test_help_is_printed_to_stderr() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    drapeau()
        .arg(&path)
        .args(["--", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("A preprocessor for LaTeX"))
        .stderr(predicate::str::contains("    --count    how many"))
        .stderr(predicate::str::contains("\nSubcommands:\n    build    build the document"));
}

#[test]
fn test_subcommand_help() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    drapeau()
        .arg(&path)
        .args(["--", "build", "--help"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage: vesti build [ARGS] [FLAGS]"))
        .stderr(predicate::str::contains("Args:\n     FILE    input"));
}

#[test]
fn test_strict_mode_rejects_empty_arguments() {
    let dir = TempDir::new().unwrap();
    let path = manifest(
        &dir,
        "name = \"strict\"\n[config]\nallow_empty_arguments = false\n",
    );

    drapeau()
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage: strict [ARGS] [FLAGS]"));
}

#[test]
fn test_manifest_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, VESTI);

    let output = drapeau()
        .env("DRAPEAU_MANIFEST", &path)
        .args(["--", "-c", "7"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output.stdout)["global"]["flags"]["count"], 7);
}

#[test]
fn test_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();

    drapeau()
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read manifest"));
}
