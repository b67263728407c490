//! Workbench configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Workbench configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); the CLI flag wins over this
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// MCP server identity
    pub server: ServerConfig,

    /// External process limits
    pub process: ProcessConfig,

    /// Coverage report location
    pub coverage: CoverageConfig,

    /// Git defaults
    pub git: GitConfig,

    /// Pull request defaults
    #[serde(rename = "pull-request")]
    pub pull_request: PullRequestConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed: a broken config is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => Self::candidate_paths().into_iter().find(|p| p.exists())?,
        };

        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    /// Project-local config first, then the user config directory
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".workbench.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("workbench").join("workbench.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// MCP server identity reported during `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "workbench".to_string(),
        }
    }
}

/// External process limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Timeout for a single git/gh/mvn invocation in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Output longer than this is truncated, keeping the tail
    #[serde(rename = "max-output-chars")]
    pub max_output_chars: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 600_000,
            max_output_chars: 30_000,
        }
    }
}

/// Coverage report location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// JaCoCo XML report, relative to the repository root
    #[serde(rename = "report-path")]
    pub report_path: PathBuf,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("target/site/jacoco/jacoco.xml"),
        }
    }
}

/// Git defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote used by `git_push` when the caller names none
    #[serde(rename = "default-remote")]
    pub default_remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            default_remote: "origin".to_string(),
        }
    }
}

/// Pull request defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestConfig {
    pub base: String,
    pub title: String,
    pub body: String,
}

impl Default for PullRequestConfig {
    fn default() -> Self {
        Self {
            base: "main".to_string(),
            title: "Automated PR".to_string(),
            body: "Automated pull request".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.log_level.is_none());
        assert_eq!(config.server.name, "workbench");
        assert_eq!(config.process.timeout_ms, 600_000);
        assert_eq!(config.git.default_remote, "origin");
        assert_eq!(
            config.coverage.report_path,
            PathBuf::from("target/site/jacoco/jacoco.xml")
        );
    }

    #[test]
    fn test_pull_request_defaults() {
        let config = PullRequestConfig::default();

        assert_eq!(config.base, "main");
        assert_eq!(config.title, "Automated PR");
        assert_eq!(config.body, "Automated pull request");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: DEBUG

process:
  timeout-ms: 60000
  max-output-chars: 1000

coverage:
  report-path: build/jacoco.xml

git:
  default-remote: upstream

pull-request:
  base: develop
  title: Nightly
  body: Generated
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(config.process.timeout_ms, 60_000);
        assert_eq!(config.process.max_output_chars, 1000);
        assert_eq!(config.coverage.report_path, PathBuf::from("build/jacoco.xml"));
        assert_eq!(config.git.default_remote, "upstream");
        assert_eq!(config.pull_request.base, "develop");
        assert_eq!(config.pull_request.title, "Nightly");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
pull-request:
  base: trunk
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.pull_request.base, "trunk");

        // Defaults for unspecified
        assert_eq!(config.pull_request.title, "Automated PR");
        assert_eq!(config.process.max_output_chars, 30_000);
        assert_eq!(config.git.default_remote, "origin");
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("wb.yml");
        fs::write(&path, "git:\n  default-remote: fork\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.git.default_remote, "fork");
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing.yml");

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_log_level() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("wb.yml");
        fs::write(&path, "log-level: WARN\n").unwrap();

        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
        assert!(Config::load_log_level(Some(&temp.path().join("nope.yml"))).is_none());
    }
}
