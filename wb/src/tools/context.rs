//! ToolContext - execution settings shared by every tool call

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{Config, PullRequestConfig};
use crate::process::ProcessRunner;

use super::ToolError;

/// Settings a tool needs at call time
///
/// Built once from the loaded `Config` and handed to every call. Holds no
/// mutable state, so concurrent calls never interact through it.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Runs git/gh/mvn with the configured timeout
    pub runner: ProcessRunner,

    /// Coverage report path relative to the repository root
    pub coverage_report: PathBuf,

    /// Remote used by `git_push` when none is given
    pub default_remote: String,

    /// Defaults for `git_pull_request`
    pub pull_request: PullRequestConfig,
}

impl ToolContext {
    pub fn from_config(config: &Config) -> Self {
        debug!(timeout_ms = config.process.timeout_ms, "ToolContext::from_config: called");
        Self {
            runner: ProcessRunner::from_config(&config.process),
            coverage_report: config.coverage.report_path.clone(),
            default_remote: config.git.default_remote.clone(),
            pull_request: config.pull_request.clone(),
        }
    }

    /// Resolve the caller's repository path, which must be an existing directory
    pub fn repo_dir(&self, repo_path: &str) -> Result<PathBuf, ToolError> {
        debug!(%repo_path, "ToolContext::repo_dir: called");
        let path = PathBuf::from(repo_path);
        if path.is_dir() {
            Ok(path)
        } else {
            debug!("ToolContext::repo_dir: not a directory");
            Err(ToolError::MissingRepo { path })
        }
    }

    /// Absolute location of the coverage report for a repository
    pub fn coverage_report_for(&self, repo: &Path) -> PathBuf {
        repo.join(&self.coverage_report)
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.process.timeout_ms = 1234;
        config.git.default_remote = "upstream".to_string();

        let ctx = ToolContext::from_config(&config);

        assert_eq!(ctx.runner.timeout(), Duration::from_millis(1234));
        assert_eq!(ctx.default_remote, "upstream");
        assert_eq!(ctx.pull_request.base, "main");
    }

    #[test]
    fn test_repo_dir_existing() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::default();

        let dir = ctx.repo_dir(temp.path().to_str().unwrap()).unwrap();
        assert_eq!(dir, temp.path());
    }

    #[test]
    fn test_repo_dir_missing() {
        let temp = tempdir().unwrap();
        let ctx = ToolContext::default();
        let missing = temp.path().join("nope");

        let result = ctx.repo_dir(missing.to_str().unwrap());
        assert!(matches!(result, Err(ToolError::MissingRepo { .. })));
    }

    #[test]
    fn test_coverage_report_for() {
        let ctx = ToolContext::default();

        let path = ctx.coverage_report_for(Path::new("/work/app"));
        assert_eq!(path, PathBuf::from("/work/app/target/site/jacoco/jacoco.xml"));
    }
}
