//! MCP server over newline-delimited stdio
//!
//! Requests are handled one at a time, in arrival order. Each line is a
//! complete JSON-RPC message; responses are written as single lines.
//! Stdout carries only protocol traffic, so all diagnostics go to tracing.

use eyre::{Context, Result};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::tools::ToolRegistry;

use super::messages::{CallToolParams, CallToolResult, DEFAULT_PROTOCOL_VERSION, McpError, Request, Response};

/// Serves the tools of one registry
pub struct McpServer<'a> {
    registry: &'a ToolRegistry,
    name: String,
    version: String,
}

impl<'a> McpServer<'a> {
    pub fn new(registry: &'a ToolRegistry, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
            version: version.into(),
        }
    }

    /// Read requests until EOF, writing one response line per request
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(name = %self.name, version = %self.version, "McpServer::serve: listening on stdio");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut json = serde_json::to_string(&response).context("Failed to serialize response")?;
                json.push('\n');
                writer
                    .write_all(json.as_bytes())
                    .await
                    .context("Failed to write response")?;
                writer.flush().await.context("Failed to flush response")?;
            }
        }

        info!("McpServer::serve: input closed, shutting down");
        Ok(())
    }

    /// Handle one raw line; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        debug!(len = line.len(), "McpServer::handle_line: called");
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "McpServer::handle_line: unparseable request");
                return Some(Response::failure(Value::Null, &McpError::Parse(e)));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "McpServer::handle_line: malformed request");
                return Some(Response::failure(id, &McpError::InvalidRequest(e.to_string())));
            }
        };

        self.handle(request).await
    }

    /// Handle a parsed request; `None` for notifications
    pub async fn handle(&self, request: Request) -> Option<Response> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "McpServer::handle: notification ignored");
            return None;
        };

        debug!(method = %request.method, ?id, "McpServer::handle: dispatching");
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(id, result),
            Err(e) => {
                warn!(error = %e, "McpServer::handle: request failed");
                Response::failure(id, &e)
            }
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, McpError> {
        match method {
            "initialize" => Ok(self.initialize(&params)),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(serde_json::json!({ "tools": self.registry.definitions() })),
            "tools/call" => self.call_tool(params).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let protocol_version = params["protocolVersion"].as_str().unwrap_or(DEFAULT_PROTOCOL_VERSION);
        info!(%protocol_version, "McpServer::initialize: client connected");

        serde_json::json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.name,
                "version": self.version
            }
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, McpError> {
        let params: CallToolParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let arguments = if params.arguments.is_null() {
            serde_json::json!({})
        } else {
            params.arguments
        };
        if !arguments.is_object() {
            return Err(McpError::InvalidParams("arguments must be an object".to_string()));
        }

        info!(tool = %params.name, "McpServer::call_tool: called");
        let result = self.registry.call(&params.name, arguments).await;
        debug!(is_error = result.is_error, "McpServer::call_tool: finished");

        serde_json::to_value(CallToolResult::text(result.content, result.is_error)).map_err(McpError::Parse)
    }
}
