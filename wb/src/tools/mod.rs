//! Tool system for the MCP server
//!
//! Each tool wraps one developer-workflow action (git, gh, mvn, a file
//! write, or arithmetic). Tools compute a `Result` internally and turn
//! failures into a labelled string only at their own boundary, so callers
//! always receive a `ToolResult` and never an unformatted fault.

mod context;
mod error;
mod registry;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use error::ToolError;
pub use registry::{ToolDefinition, ToolRegistry};
pub use traits::{Tool, ToolResult, optional_str, required_str};
