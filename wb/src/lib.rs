//! Workbench - developer-workflow tools over the Model Context Protocol
//!
//! A small set of tools an AI assistant can call to drive a Java/Maven
//! project: inspect and stage git changes, commit with the current JaCoCo
//! instruction coverage appended, push, open a GitHub pull request, run the
//! Maven test suite, scaffold boundary tests, and evaluate arithmetic.
//!
//! # Modules
//!
//! - [`tools`] - Tool trait, registry and the built-in tools
//! - [`mcp`] - JSON-RPC server exposing a registry over stdio
//! - [`coverage`] - JaCoCo report parsing and commit-message composition
//! - [`calc`] - Safe arithmetic expression evaluator
//! - [`process`] - Subprocess runner with timeout and output capture
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod calc;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod mcp;
pub mod process;
pub mod tools;

pub use config::Config;
pub use coverage::{CoverageError, CoverageReport, compose_commit_message, coverage_percent};
pub use mcp::McpServer;
pub use process::{CommandOutput, ProcessRunner};
pub use tools::{Tool, ToolContext, ToolError, ToolRegistry, ToolResult};
