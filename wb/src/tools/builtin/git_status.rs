//! git_status tool - short-form working tree status

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError, ToolResult, required_str};

use super::repo_path_property;

/// Reported when `git status --short` prints nothing
pub const CLEAN_TREE: &str = "Clean working tree.";

/// Show staged/unstaged changes and conflicts
pub struct GitStatusTool;

#[async_trait]
impl Tool for GitStatusTool {
    fn name(&self) -> &'static str {
        "git_status"
    }

    fn description(&self) -> &'static str {
        "Return git status including staged/unstaged changes and conflicts."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "repo_path": repo_path_property()
            },
            "required": ["repo_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "GitStatusTool::execute: called");
        let repo_path = match required_str(&input, "repo_path") {
            Ok(p) => p,
            Err(result) => return result,
        };

        ToolResult::from_outcome(status(repo_path, ctx).await, "Git Status Error")
    }
}

async fn status(repo_path: &str, ctx: &ToolContext) -> Result<String, ToolError> {
    let repo = ctx.repo_dir(repo_path)?;
    let out = ctx
        .runner
        .run("git", &["status", "--short"], &repo)
        .await?
        .into_checked("git")?;

    if out.stdout.is_empty() {
        debug!("status: working tree clean");
        Ok(CLEAN_TREE.to_string())
    } else {
        Ok(out.stdout)
    }
}
