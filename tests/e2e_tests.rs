//! End-to-end tests for the reactup CLI
//!
//! These tests verify:
//! - Exit codes for input, file and registry errors
//! - Argument validation messages
//! - The manifest is untouched when a run fails
//!
//! None of them need network access.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "name": "storefront",
  "dependencies": {
    "react": "^18.2.0",
    "react-select": "^3.0.4"
  }
}
"#;

/// Registry URL nothing listens on
const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:9";

fn reactup() -> Command {
    let mut cmd = Command::cargo_bin("reactup").unwrap();
    cmd.env("REACTUP_REGISTRY", UNREACHABLE_REGISTRY)
        .env_remove("RUST_LOG");
    cmd
}

fn create_test_project() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("package.json"), MANIFEST).unwrap();
    temp_dir
}

mod exit_code_tests {
    use super::*;

    #[test]
    fn test_exit_code_help() {
        reactup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--react"))
            .stdout(predicate::str::contains("--with-companions"));
    }

    #[test]
    fn test_exit_code_version() {
        reactup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_json_without_react() {
        let temp_dir = create_test_project();
        reactup()
            .arg(temp_dir.path())
            .arg("--json")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("--json requires --react"));
    }

    #[test]
    fn test_missing_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        reactup()
            .arg(temp_dir.path())
            .args(["--react", "19"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("manifest file not found"));
    }

    #[test]
    fn test_invalid_manifest_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{ not json").unwrap();
        reactup()
            .arg(temp_dir.path())
            .args(["--react", "19"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("failed to parse JSON"));
    }

    #[test]
    fn test_invalid_fix_policy() {
        reactup()
            .args(["--fix", "newest"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid fix policy"));
    }

    #[test]
    fn test_unreachable_registry_is_fatal() {
        let temp_dir = create_test_project();
        reactup()
            .arg(temp_dir.path())
            .args(["--react", "19", "--fix", "nearest", "--no-install"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Error:"));

        let content = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        assert_eq!(content, MANIFEST);
    }
}

mod cli_options_tests {
    use super::*;

    #[test]
    fn test_manifest_file_path_argument() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = temp_dir.path().join("package.json");
        reactup()
            .arg(&manifest)
            .arg("--json")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("requires --react"));
    }

    #[test]
    fn test_verbose_prints_project() {
        let temp_dir = create_test_project();
        reactup()
            .arg(temp_dir.path())
            .args(["--react", "19", "--verbose"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("reactup v"))
            .stderr(predicate::str::contains("Project:"));
    }

    #[test]
    fn test_json_mode_keeps_stdout_clean_on_error() {
        let temp_dir = create_test_project();
        reactup()
            .arg(temp_dir.path())
            .args(["--react", "19", "--json"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty());
    }
}
