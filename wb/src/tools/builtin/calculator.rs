//! calculator tool - evaluate an arithmetic expression

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::calc;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, required_str};

/// Evaluate a basic math expression
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn description(&self) -> &'static str {
        "Evaluate a basic math expression (numbers, + - * / // % ^ and parentheses)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Arithmetic expression, e.g. (2 + 3) * 4"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!(?input, "CalculatorTool::execute: called");
        let expression = match required_str(&input, "expression") {
            Ok(e) => e,
            Err(result) => return result,
        };

        let outcome = calc::evaluate(expression)
            .map(|n| n.to_string())
            .map_err(ToolError::from);
        ToolResult::from_outcome(outcome, "Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn calculate(expression: &str) -> ToolResult {
        CalculatorTool
            .execute(serde_json::json!({"expression": expression}), &ToolContext::default())
            .await
    }

    #[tokio::test]
    async fn test_calculator_basic() {
        let result = calculate("2 + 3 * 4").await;
        assert!(!result.is_error);
        assert_eq!(result.content, "14");
    }

    #[tokio::test]
    async fn test_calculator_float() {
        assert_eq!(calculate("7 / 2").await.content, "3.5");
    }

    #[tokio::test]
    async fn test_calculator_division_by_zero() {
        let result = calculate("1/0").await;
        assert!(result.is_error);
        assert_eq!(result.content, "Error: division by zero");
    }

    #[tokio::test]
    async fn test_calculator_rejects_code() {
        let result = calculate("__import__('os').system('ls')").await;
        assert!(result.is_error);
        assert!(result.content.starts_with("Error: unexpected character"));
    }
}
