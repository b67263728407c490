//! git_commit tool - commit staged changes with a coverage trailer

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use crate::coverage::{NOT_AVAILABLE, compose_commit_message, coverage_percent};
use crate::process::CommandOutput;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, required_str};

use super::{raw_output, repo_path_property};

/// Commit staged changes, appending instruction coverage to the message
pub struct GitCommitTool;

#[async_trait]
impl Tool for GitCommitTool {
    fn name(&self) -> &'static str {
        "git_commit"
    }

    fn description(&self) -> &'static str {
        "Commit staged changes with coverage info added to message."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "repo_path": repo_path_property(),
                "message": {
                    "type": "string",
                    "description": "Commit message; a 'Coverage: <percent>' line is appended"
                }
            },
            "required": ["repo_path", "message"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "GitCommitTool::execute: called");
        let repo_path = match required_str(&input, "repo_path") {
            Ok(p) => p,
            Err(result) => return result,
        };
        let message = match required_str(&input, "message") {
            Ok(m) => m,
            Err(result) => return result,
        };

        raw_output(commit(repo_path, message, ctx).await, "Git Commit Error")
    }
}

async fn commit(repo_path: &str, message: &str, ctx: &ToolContext) -> Result<CommandOutput, ToolError> {
    let repo = ctx.repo_dir(repo_path)?;
    let coverage = coverage_line(&ctx.coverage_report_for(&repo));
    let full_message = compose_commit_message(message, &coverage);
    debug!(%coverage, "commit: composed message");

    ctx.runner.run("git", &["commit", "-m", &full_message], &repo).await
}

/// A broken report never blocks a commit
fn coverage_line(report: &Path) -> String {
    match coverage_percent(report) {
        Ok(percent) => percent,
        Err(e) => {
            warn!(?report, error = %e, "coverage_line: unreadable coverage report");
            NOT_AVAILABLE.to_string()
        }
    }
}
