//! git_add_all tool - stage everything except build and IDE directories

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::tools::{Tool, ToolContext, ToolError, ToolResult, required_str};

use super::repo_path_property;

/// Directories that are never staged
pub const EXCLUDED_PATHS: [&str; 3] = ["target", ".venv", ".idea"];

/// Stage changes but exclude build artifacts
pub struct GitAddAllTool;

#[async_trait]
impl Tool for GitAddAllTool {
    fn name(&self) -> &'static str {
        "git_add_all"
    }

    fn description(&self) -> &'static str {
        "Stage all changes except build artifacts (target, .venv, .idea)."
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
        debug!(?input, "GitAddAllTool::execute: called");
        let repo_path = match required_str(&input, "repo_path") {
            Ok(p) => p,
            Err(result) => return result,
        };

        ToolResult::from_outcome(add_all(repo_path, ctx).await, "Git Add Error")
    }
}

async fn add_all(repo_path: &str, ctx: &ToolContext) -> Result<String, ToolError> {
    let repo = worktree_root(&ctx.repo_dir(repo_path)?, ctx).await?;

    // Untrack anything already committed under an excluded directory
    for excluded in EXCLUDED_PATHS {
        let out = ctx
            .runner
            .run(
                "git",
                &["rm", "-r", "--cached", "--ignore-unmatch", "--quiet", "--", excluded],
                &repo,
            )
            .await?;
        if !out.success() {
            warn!(%excluded, stderr = %out.stderr.trim(), "add_all: failed to untrack excluded path");
        }
    }

    let exclusions: Vec<String> = EXCLUDED_PATHS.iter().map(|p| format!(":(exclude){}", p)).collect();
    let mut args = vec!["add", "-A", "--", "."];
    args.extend(exclusions.iter().map(String::as_str));

    ctx.runner.run("git", &args, &repo).await?.into_checked("git")?;

    debug!("add_all: changes staged");
    Ok("Changes staged.".to_string())
}

/// Top of the worktree containing `dir`; staging always covers the whole tree
async fn worktree_root(dir: &Path, ctx: &ToolContext) -> Result<PathBuf, ToolError> {
    let out = ctx
        .runner
        .run("git", &["rev-parse", "--show-toplevel"], dir)
        .await?
        .into_checked("git")?;
    let root = PathBuf::from(out.stdout.trim());
    debug!(?root, "worktree_root: resolved");
    Ok(root)
}
