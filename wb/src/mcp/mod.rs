//! Model Context Protocol server
//!
//! Exposes a `ToolRegistry` to MCP clients over stdio using JSON-RPC 2.0.

mod messages;
mod server;

pub use messages::{
    CallToolParams, CallToolResult, DEFAULT_PROTOCOL_VERSION, McpError, Request, Response, RpcError, TextContent,
};
pub use server::McpServer;
