//! ToolRegistry - the table of tools a server exposes

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::builtin::{
    BoundaryTestTool, CalculatorTool, GitAddAllTool, GitCommitTool, GitPullRequestTool, GitPushTool, GitStatusTool,
    MavenTestTool,
};
use super::{Tool, ToolContext, ToolResult};

/// Tool metadata as advertised by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Explicit name → tool table, built at startup and passed by reference
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a registry with the standard tools
    pub fn standard(ctx: ToolContext) -> Self {
        let mut registry = Self::empty(ctx);

        // Git
        registry.register(Box::new(GitStatusTool));
        registry.register(Box::new(GitAddAllTool));
        registry.register(Box::new(GitCommitTool));
        registry.register(Box::new(GitPushTool));
        registry.register(Box::new(GitPullRequestTool));

        // Java build and tests
        registry.register(Box::new(MavenTestTool));
        registry.register(Box::new(BoundaryTestTool));

        registry.register(Box::new(CalculatorTool));

        debug!(count = registry.tools.len(), "ToolRegistry::standard: tools registered");
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty(ctx: ToolContext) -> Self {
        Self {
            tools: BTreeMap::new(),
            ctx,
        }
    }

    /// Add a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Call a tool by name
    pub async fn call(&self, name: &str, input: Value) -> ToolResult {
        debug!(%name, "ToolRegistry::call: called");
        match self.tools.get(name) {
            Some(tool) => tool.execute(input, &self.ctx).await,
            None => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }
}
