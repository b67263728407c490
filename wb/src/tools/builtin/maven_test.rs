//! run_maven_tests tool - `mvn test` in the repository

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult, required_str};

use super::{raw_output, repo_path_property};

/// Run Maven tests and return the build output
pub struct MavenTestTool;

#[async_trait]
impl Tool for MavenTestTool {
    fn name(&self) -> &'static str {
        "run_maven_tests"
    }

    fn description(&self) -> &'static str {
        "Run Maven tests (mvn test) and return the result."
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
        debug!(?input, "MavenTestTool::execute: called");
        let repo_path = match required_str(&input, "repo_path") {
            Ok(p) => p,
            Err(result) => return result,
        };

        let outcome = match ctx.repo_dir(repo_path) {
            Ok(repo) => ctx.runner.run("mvn", &["test"], &repo).await,
            Err(e) => Err(e),
        };

        raw_output(outcome, "Error running mvn test")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_repo_directory() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("gone");

        let result = MavenTestTool
            .execute(
                serde_json::json!({"repo_path": missing.to_str().unwrap()}),
                &ToolContext::default(),
            )
            .await;

        assert!(result.is_error);
        assert!(result.content.starts_with("Error running mvn test: Repository path does not exist"));
    }

    #[tokio::test]
    async fn test_missing_repo_path() {
        let result = MavenTestTool
            .execute(serde_json::json!({"repo_path": 42}), &ToolContext::default())
            .await;

        assert!(result.is_error);
        assert_eq!(result.content, "repo_path is required");
    }
}
