//! git_pull_request tool - open a pull request with the GitHub CLI

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError, ToolResult, optional_str, required_str};

use super::{reject_option_like, repo_path_property};

/// Create a pull request via `gh pr create`
pub struct GitPullRequestTool;

#[async_trait]
impl Tool for GitPullRequestTool {
    fn name(&self) -> &'static str {
        "git_pull_request"
    }

    fn description(&self) -> &'static str {
        "Create a pull request for the current branch using the GitHub CLI."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "repo_path": repo_path_property(),
                "base": {
                    "type": "string",
                    "description": "Base branch (default: main)"
                },
                "title": {
                    "type": "string",
                    "description": "Pull request title (default: Automated PR)"
                },
                "body": {
                    "type": "string",
                    "description": "Pull request body (default: Automated pull request)"
                }
            },
            "required": ["repo_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "GitPullRequestTool::execute: called");
        let repo_path = match required_str(&input, "repo_path") {
            Ok(p) => p,
            Err(result) => return result,
        };
        let request = PullRequest {
            base: optional_str(&input, "base", &ctx.pull_request.base),
            title: optional_str(&input, "title", &ctx.pull_request.title),
            body: optional_str(&input, "body", &ctx.pull_request.body),
        };

        ToolResult::from_outcome(create(repo_path, &request, ctx).await, "PR Error")
    }
}

struct PullRequest<'a> {
    base: &'a str,
    title: &'a str,
    body: &'a str,
}

async fn create(repo_path: &str, request: &PullRequest<'_>, ctx: &ToolContext) -> Result<String, ToolError> {
    reject_option_like("base", request.base)?;
    let repo = ctx.repo_dir(repo_path)?;

    // Title and body are passed as flag values, so a leading '-' is harmless there
    let args = [
        "pr",
        "create",
        "--base",
        request.base,
        "--title",
        request.title,
        "--body",
        request.body,
    ];
    let out = ctx.runner.run("gh", &args, &repo).await?.into_checked("gh")?;

    debug!(stdout = %out.stdout.trim(), "create: pull request created");
    Ok(format!("PR created: {}", out.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_outside_repository_reports_pr_error() {
        let temp = tempdir().unwrap();

        let result = GitPullRequestTool
            .execute(
                serde_json::json!({"repo_path": temp.path().to_str().unwrap()}),
                &ToolContext::default(),
            )
            .await;

        // gh is either missing or refuses to run outside a repository
        assert!(result.is_error);
        assert!(result.content.starts_with("PR Error: "), "{}", result.content);
    }

    #[tokio::test]
    async fn test_missing_repo_directory() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("gone");

        let result = GitPullRequestTool
            .execute(
                serde_json::json!({"repo_path": missing.to_str().unwrap()}),
                &ToolContext::default(),
            )
            .await;

        assert!(result.is_error);
        assert!(result.content.starts_with("PR Error: Repository path does not exist"));
    }

    #[tokio::test]
    async fn test_option_like_base_rejected() {
        let temp = tempdir().unwrap();

        let result = GitPullRequestTool
            .execute(
                serde_json::json!({"repo_path": temp.path().to_str().unwrap(), "base": "-R"}),
                &ToolContext::default(),
            )
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("base must not start with '-'"));
    }
}
