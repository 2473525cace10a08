//! Integration tests for the gitwh binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn gitwh() -> Command {
    cargo_bin_cmd!("gitwh")
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_gitwh_help() {
        gitwh()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("check"));
    }

    #[test]
    fn test_gitwh_version() {
        gitwh()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gitwh"));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        gitwh().arg("deploy").assert().failure();
    }
}

// =============================================================================
// Config Check Tests
// =============================================================================

mod check {
    use super::*;

    #[test]
    fn test_check_valid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "gitwh.yaml",
            r#"
listen: ":9000"
buffer_size: 5
timeout: 30
repos:
  demo:
    secret: s3cret
    folders:
      - /srv/demo
"#,
        );

        gitwh()
            .arg("--config")
            .arg(&path)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 repo(s), buffer size 5, timeout 30s"))
            .stdout(predicate::str::contains("No warnings."))
            .stdout(predicate::str::contains("s3cret").not());
    }

    #[test]
    fn test_check_json_conf_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "gitwh.conf",
            r#"{"repos": {"a": {"folders": ["/srv/a"]}, "b": {"folders": ["/srv/b"]}}}"#,
        );

        gitwh()
            .args(["check", "-c"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("2 repo(s), buffer size 3, timeout 10s"));
    }

    #[test]
    fn test_check_toml_reports_warnings() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "gitwh.toml",
            r#"
[repos.demo]
folders = ["relative/path"]
"#,
        );

        gitwh()
            .arg("-c")
            .arg(&path)
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Warnings:"))
            .stdout(predicate::str::contains("relative/path"));
    }

    #[test]
    fn test_check_unknown_extension_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "gitwh.txt", "repos: {}");

        gitwh()
            .arg("-c")
            .arg(&path)
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown config file extension"));
    }

    #[test]
    fn test_check_missing_file_fails() {
        let dir = TempDir::new().unwrap();

        gitwh()
            .arg("-c")
            .arg(dir.path().join("absent.yaml"))
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load config"));
    }

    #[test]
    fn test_check_rejects_zero_buffer() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "gitwh.yml", "buffer_size: 0\n");

        gitwh()
            .arg("-c")
            .arg(&path)
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("buffer_size"));
    }

    #[test]
    fn test_listen_override_is_validated() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "gitwh.yaml", "repos: {}\n");

        gitwh()
            .arg("-c")
            .arg(&path)
            .args(["--listen", "not-an-address", "check"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("listen address"));
    }
}
