//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::context::ToolContext;
use super::error::ToolError;

/// A tool that can be called by an MCP client
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the MCP `tools/call` name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        debug!("ToolResult::error: called");
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Collapse an internal result into the string surface, prefixing failures with `label`
    pub fn from_outcome(outcome: Result<String, ToolError>, label: &str) -> Self {
        match outcome {
            Ok(content) => Self::success(content),
            Err(e) => {
                debug!(%e, %label, "ToolResult::from_outcome: tool failed");
                Self::error(format!("{}: {}", label, e))
            }
        }
    }
}

/// Pull a required string argument out of the tool input
pub fn required_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, ToolResult> {
    match input[key].as_str() {
        Some(s) => Ok(s),
        None => {
            debug!(%key, "required_str: missing parameter");
            Err(ToolResult::error(format!("{} is required", key)))
        }
    }
}

/// Pull an optional string argument, falling back to `default` when absent or empty
pub fn optional_str<'a>(input: &'a Value, key: &str, default: &'a str) -> &'a str {
    match input[key].as_str() {
        Some(s) if !s.is_empty() => s,
        _ => default,
    }
}
