//! git_push tool - push the current branch

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::process::CommandOutput;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, optional_str, required_str};

use super::{raw_output, reject_option_like, repo_path_property};

/// Push HEAD to a remote
pub struct GitPushTool;

#[async_trait]
impl Tool for GitPushTool {
    fn name(&self) -> &'static str {
        "git_push"
    }

    fn description(&self) -> &'static str {
        "Push the current branch (HEAD) to a remote."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "repo_path": repo_path_property(),
                "remote": {
                    "type": "string",
                    "description": "Remote name (default: origin)"
                }
            },
            "required": ["repo_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "GitPushTool::execute: called");
        let repo_path = match required_str(&input, "repo_path") {
            Ok(p) => p,
            Err(result) => return result,
        };
        let remote = optional_str(&input, "remote", &ctx.default_remote);

        raw_output(push(repo_path, remote, ctx).await, "Git Push Error")
    }
}

async fn push(repo_path: &str, remote: &str, ctx: &ToolContext) -> Result<CommandOutput, ToolError> {
    reject_option_like("remote", remote)?;
    let repo = ctx.repo_dir(repo_path)?;
    debug!(%remote, "push: pushing HEAD");
    ctx.runner.run("git", &["push", remote, "HEAD"], &repo).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::testing::{git, init_repo};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn repo_with_commit(dir: &Path) {
        init_repo(dir);
        fs::write(dir.join("README.md"), "hi").unwrap();
        git(dir, &["add", "README.md"]);
        git(dir, &["commit", "-q", "-m", "initial"]);
    }

    #[tokio::test]
    async fn test_push_to_default_remote() {
        let temp = tempdir().unwrap();
        let remote = temp.path().join("remote.git");
        let work = temp.path().join("work");
        fs::create_dir_all(&remote).unwrap();
        fs::create_dir_all(&work).unwrap();
        git(&remote, &["init", "--bare", "-q"]);
        repo_with_commit(&work);
        git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);

        let result = GitPushTool
            .execute(
                serde_json::json!({"repo_path": work.to_str().unwrap()}),
                &ToolContext::default(),
            )
            .await;

        assert!(!result.is_error, "{}", result.content);
        let head = git(&work, &["rev-parse", "HEAD"]);
        let refs = git(&work, &["ls-remote", "origin"]);
        assert!(refs.contains(head.trim()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_remote() {
        let temp = tempdir().unwrap();
        repo_with_commit(temp.path());

        let result = GitPushTool
            .execute(
                serde_json::json!({"repo_path": temp.path().to_str().unwrap(), "remote": "nowhere"}),
                &ToolContext::default(),
            )
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("nowhere"));
    }

    #[tokio::test]
    async fn test_option_like_remote_rejected() {
        let temp = tempdir().unwrap();

        let result = GitPushTool
            .execute(
                serde_json::json!({"repo_path": temp.path().to_str().unwrap(), "remote": "--mirror"}),
                &ToolContext::default(),
            )
            .await;

        assert!(result.is_error);
        assert!(result.content.starts_with("Git Push Error: Invalid argument"));
    }
}
