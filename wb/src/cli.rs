//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Workbench - developer-workflow tools for MCP clients
#[derive(Parser)]
#[command(
    name = "wb",
    about = "Git, GitHub, Maven and coverage tools served over the Model Context Protocol",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the tools over MCP on stdin/stdout
    Serve,

    /// List the registered tools
    Tools {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Invoke one tool directly
    Call {
        /// Tool name
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(value_name = "JSON")]
        input: Option<String>,
    },

    /// Print the instruction coverage of a JaCoCo XML report
    Coverage {
        /// Report path (defaults to coverage.report-path from config)
        path: Option<PathBuf>,
    },
}

/// Result of checking a required tool
pub struct ToolCheck {
    pub name: &'static str,
    pub available: bool,
    pub version: Option<String>,
}

impl ToolCheck {
    /// Check if a tool is available and get its version
    pub fn check(name: &'static str, version_args: &[&str]) -> Self {
        debug!(name, ?version_args, "ToolCheck::check: called");
        match std::process::Command::new(name).args(version_args).output() {
            Ok(output) if output.status.success() => {
                let version = parse_version(&String::from_utf8_lossy(&output.stdout));
                debug!(name, %version, "ToolCheck::check: tool available");
                Self {
                    name,
                    available: true,
                    version: Some(version),
                }
            }
            _ => {
                debug!(name, "ToolCheck::check: tool not available");
                Self {
                    name,
                    available: false,
                    version: None,
                }
            }
        }
    }
}

/// First version-like word in command output
fn parse_version(output: &str) -> String {
    for word in output.split_whitespace() {
        let word = word.trim_start_matches('v');
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            let version: String = word.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
            if !version.is_empty() {
                return version;
            }
        }
    }
    "unknown".to_string()
}

/// External programs the tools shell out to
pub fn check_required_tools() -> Vec<ToolCheck> {
    debug!("check_required_tools: called");
    vec![
        ToolCheck::check("git", &["--version"]),
        ToolCheck::check("gh", &["--version"]),
        ToolCheck::check("mvn", &["-v"]),
    ]
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workbench")
        .join("logs")
        .join("workbench.log")
}

/// Generate the after_help text with tool checks and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::from("Required Tools:\n");
    for tool in check_required_tools() {
        let icon = if tool.available { "\u{2705}" } else { "\u{274C}" };
        let version = tool.version.as_deref().unwrap_or("not found");
        help.push_str(&format!("  {} {:<10} {}\n", icon, tool.name, version));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Output format for listing commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["wb"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["wb", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_cli_parse_tools_json() {
        let cli = Cli::parse_from(["wb", "tools", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Some(Command::Tools {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_cli_parse_call() {
        let cli = Cli::parse_from(["wb", "call", "calculator", r#"{"expression":"1+1"}"#]);
        if let Some(Command::Call { tool, input }) = cli.command {
            assert_eq!(tool, "calculator");
            assert_eq!(input.as_deref(), Some(r#"{"expression":"1+1"}"#));
        } else {
            panic!("Expected Call command");
        }
    }

    #[test]
    fn test_cli_parse_call_without_input() {
        let cli = Cli::parse_from(["wb", "call", "git_status"]);
        assert!(matches!(cli.command, Some(Command::Call { input: None, .. })));
    }

    #[test]
    fn test_cli_parse_coverage() {
        let cli = Cli::parse_from(["wb", "coverage", "build/jacoco.xml"]);
        if let Some(Command::Coverage { path }) = cli.command {
            assert_eq!(path, Some(PathBuf::from("build/jacoco.xml")));
        } else {
            panic!("Expected Coverage command");
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::parse_from(["wb", "serve", "-c", "/etc/wb.yml", "-l", "debug"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/wb.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("git version 2.43.0"), "2.43.0");
        assert_eq!(parse_version("gh version 2.45.0 (2024-03-04)"), "2.45.0");
        assert_eq!(parse_version("Apache Maven 3.9.6 (bc0240f3)"), "3.9.6");
        assert_eq!(parse_version("no digits here"), "unknown");
    }

    #[test]
    fn test_log_path_file_name() {
        let path = get_log_path();
        assert!(path.ends_with("workbench/logs/workbench.log"));
    }
}
