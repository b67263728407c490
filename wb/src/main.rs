//! Workbench - developer-workflow tools over MCP
//!
//! CLI entry point: serve the tools on stdio, list them, or call one directly.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use workbench::cli::{Cli, Command, OutputFormat, generate_after_help, get_log_path};
use workbench::config::Config;
use workbench::coverage::{NOT_AVAILABLE, coverage_percent};
use workbench::mcp::McpServer;
use workbench::tools::{ToolContext, ToolRegistry};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches_mut())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(server = %config.server.name, "Workbench loaded config");

    let registry = ToolRegistry::standard(ToolContext::from_config(&config));

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve) => cmd_serve(&config, &registry).await,
        Some(Command::Tools { format }) => cmd_tools(&registry, format),
        Some(Command::Call { tool, input }) => cmd_call(&registry, &tool, input.as_deref()).await,
        Some(Command::Coverage { path }) => cmd_coverage(&config, path),
        None => {
            cmd.print_help()?;
            Ok(())
        }
    }
}

async fn cmd_serve(config: &Config, registry: &ToolRegistry) -> Result<()> {
    debug!("cmd_serve: called");
    let server = McpServer::new(registry, &config.server.name, env!("GIT_DESCRIBE"));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server.serve(stdin, tokio::io::stdout()).await
}

fn cmd_tools(registry: &ToolRegistry, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_tools: called");
    let definitions = registry.definitions();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        OutputFormat::Text => {
            for def in &definitions {
                println!("{:<24} {}", def.name.cyan().bold(), def.description);
            }
        }
    }
    Ok(())
}

async fn cmd_call(registry: &ToolRegistry, tool: &str, input: Option<&str>) -> Result<()> {
    debug!(%tool, ?input, "cmd_call: called");
    let input: Value = match input {
        Some(json) => serde_json::from_str(json).context("Tool input must be a JSON object")?,
        None => serde_json::json!({}),
    };
    if !input.is_object() {
        eyre::bail!("Tool input must be a JSON object");
    }

    let result = registry.call(tool, input).await;
    if result.is_error {
        eprintln!("{}", result.content.red());
        std::process::exit(1);
    }
    println!("{}", result.content);
    Ok(())
}

fn cmd_coverage(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| config.coverage.report_path.clone());
    debug!(?path, "cmd_coverage: called");
    let percent = coverage_percent(&path).unwrap_or_else(|e| {
        warn!(error = %e, "cmd_coverage: unreadable report");
        NOT_AVAILABLE.to_string()
    });
    println!("{}", percent);
    Ok(())
}
