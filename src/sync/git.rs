//! `git pull` as a sync operation.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::SyncOperation;
use crate::errors::SyncError;

/// Environment variable overriding the git executable.
pub const GIT_ENV: &str = "GITWH_GIT";

/// Runs `git pull` inside the target directory.
#[derive(Debug, Clone)]
pub struct GitPull {
    git: String,
}

impl Default for GitPull {
    fn default() -> Self {
        Self::new(std::env::var(GIT_ENV).unwrap_or_else(|_| "git".to_string()))
    }
}

impl GitPull {
    pub fn new(git: impl Into<String>) -> Self {
        Self { git: git.into() }
    }

    pub fn program(&self) -> &str {
        &self.git
    }
}

#[async_trait]
impl SyncOperation for GitPull {
    async fn sync(&self, path: &Path) -> Result<(), SyncError> {
        debug!(path = %path.display(), git = %self.git, "running git pull");

        let child = Command::new(&self.git)
            .arg("pull")
            .current_dir(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SyncError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| SyncError::Wait {
                path: path.to_path_buf(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SyncError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn git(dir: &Path, args: &[&str]) -> bool {
        std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_program_override() {
        assert_eq!(GitPull::new("/usr/local/bin/git").program(), "/usr/local/bin/git");
    }

    #[tokio::test]
    async fn test_missing_directory_is_spawn_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = GitPull::new("git").sync(&missing).await.unwrap_err();
        assert!(matches!(err, SyncError::Spawn { ref path, .. } if path == &missing));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let dir = tempdir().unwrap();
        let err = GitPull::new("gitwh-no-such-binary")
            .sync(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_not_a_repository_is_non_zero_exit() {
        let dir = tempdir().unwrap();
        if !git(dir.path(), &["--version"]) {
            eprintln!("Skipping test_not_a_repository_is_non_zero_exit (git not installed)");
            return;
        }
        let err = GitPull::new("git").sync(dir.path()).await.unwrap_err();
        match err {
            SyncError::NonZeroExit { code, .. } => assert_ne!(code, Some(0)),
            other => panic!("Expected NonZeroExit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pull_from_local_remote() {
        let root = tempdir().unwrap();
        let origin = root.path().join("origin");
        let clone = root.path().join("clone");
        std::fs::create_dir(&origin).unwrap();

        let ok = git(&origin, &["init", "-q"])
            && git(&origin, &["config", "user.email", "gitwh@example.com"])
            && git(&origin, &["config", "user.name", "gitwh"])
            && git(&origin, &["commit", "-q", "--allow-empty", "-m", "one"])
            && git(
                root.path(),
                &["clone", "-q", origin.to_str().unwrap(), clone.to_str().unwrap()],
            )
            && git(&origin, &["commit", "-q", "--allow-empty", "-m", "two"]);
        if !ok {
            eprintln!("Skipping test_pull_from_local_remote (git unavailable)");
            return;
        }

        GitPull::new("git").sync(&clone).await.unwrap();

        let log = std::process::Command::new("git")
            .args(["log", "-1", "--format=%s"])
            .current_dir(&clone)
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "two");
    }
}
