//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

use crate::calc::ExprError;

/// Errors that can occur during tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout_ms}ms")]
    CommandTimeout { program: String, timeout_ms: u64 },

    #[error("{program} exited with code {code}: {output}")]
    CommandFailed { program: String, code: i32, output: String },

    #[error("Repository path does not exist: {path}")]
    MissingRepo { path: PathBuf },

    #[error("Unsupported parameter type: {0}")]
    UnsupportedType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Expression(#[from] ExprError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_timeout_message() {
        let err = ToolError::CommandTimeout {
            program: "mvn".to_string(),
            timeout_ms: 1500,
        };

        let msg = err.to_string();
        assert!(msg.contains("mvn"));
        assert!(msg.contains("1500ms"));
    }

    #[test]
    fn test_command_failed_message() {
        let err = ToolError::CommandFailed {
            program: "git".to_string(),
            code: 128,
            output: "fatal: not a git repository".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("128"));
        assert!(msg.contains("not a git repository"));
    }

    #[test]
    fn test_expression_error_is_transparent() {
        let err: ToolError = ExprError::DivisionByZero.into();
        assert_eq!(err.to_string(), "division by zero");
    }
}
