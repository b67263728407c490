//! Built-in tools

mod calculator;
mod git_add_all;
mod git_commit;
mod git_pull_request;
mod git_push;
mod git_status;
mod maven_test;

pub use boundary_test::{BoundaryTestTool, BoundaryValues, render_stub, stub_path};
pub use calculator::CalculatorTool;
pub use git_add_all::{EXCLUDED_PATHS, GitAddAllTool};
pub use git_commit::GitCommitTool;
pub use git_pull_request::GitPullRequestTool;
pub use git_push::GitPushTool;
pub use git_status::{CLEAN_TREE, GitStatusTool};
pub use maven_test::MavenTestTool;

use serde_json::Value;

use crate::process::CommandOutput;

use super::{ToolError, ToolResult};

/// Schema fragment for the `repo_path` argument every process tool takes
fn repo_path_property() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "Path to the repository working directory"
    })
}

/// Pass process output through untouched: stdout if any, otherwise stderr
///
/// A non-zero exit keeps the same text but marks the result as an error.
fn raw_output(outcome: Result<CommandOutput, ToolError>, label: &str) -> ToolResult {
    match outcome {
        Ok(out) if out.success() => ToolResult::success(out.stdout_or_stderr()),
        Ok(out) => ToolResult::error(out.stdout_or_stderr()),
        Err(e) => ToolResult::error(format!("{}: {}", label, e)),
    }
}

/// Values handed to git/gh as positional arguments must not parse as options
fn reject_option_like(name: &str, value: &str) -> Result<(), ToolError> {
    if value.starts_with('-') {
        return Err(ToolError::InvalidArgument(format!("{} must not start with '-': {}", name, value)));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output_success_uses_stdout() {
        let out = CommandOutput {
            code: Some(0),
            stdout: "[main abc123] fix".to_string(),
            stderr: String::new(),
        };
        let result = raw_output(Ok(out), "Git Commit Error");
        assert!(!result.is_error);
        assert_eq!(result.content, "[main abc123] fix");
    }

    #[test]
    fn test_raw_output_failure_keeps_text() {
        let out = CommandOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "error: failed to push".to_string(),
        };
        let result = raw_output(Ok(out), "Git Push Error");
        assert!(result.is_error);
        assert_eq!(result.content, "error: failed to push");
    }

    #[test]
    fn test_raw_output_spawn_error_is_labelled() {
        let err = ToolError::InvalidArgument("x".to_string());
        let result = raw_output(Err(err), "Error running mvn test");
        assert_eq!(result.content, "Error running mvn test: Invalid argument: x");
    }

    #[test]
    fn test_reject_option_like() {
        assert!(reject_option_like("remote", "origin").is_ok());
        assert!(reject_option_like("remote", "--upload-pack=evil").is_err());
    }
}
