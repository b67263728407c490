//! External process execution shared by the git, gh and mvn tools

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tracing::debug;

use crate::config::ProcessConfig;
use crate::tools::ToolError;

/// Captured result of a finished child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout when it has anything, otherwise stderr
    pub fn stdout_or_stderr(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            self.stdout.clone()
        }
    }

    /// Turn a non-zero exit into `ToolError::CommandFailed`
    pub fn into_checked(self, program: &str) -> Result<Self, ToolError> {
        if self.success() {
            return Ok(self);
        }
        debug!(%program, code = ?self.code, "CommandOutput::into_checked: command failed");
        Err(ToolError::CommandFailed {
            program: program.to_string(),
            code: self.code.unwrap_or(-1),
            output: self.stdout_or_stderr().trim().to_string(),
        })
    }
}

/// Runs programs in a caller-supplied directory with a timeout
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    max_output_chars: usize,
}

impl ProcessRunner {
    pub fn new(timeout: Duration, max_output_chars: usize) -> Self {
        Self {
            timeout,
            max_output_chars,
        }
    }

    pub fn from_config(config: &ProcessConfig) -> Self {
        Self::new(Duration::from_millis(config.timeout_ms), config.max_output_chars)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args` in `cwd` and capture its output
    ///
    /// A non-zero exit is not an error here; callers decide what failure means.
    pub async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, ToolError> {
        debug!(%program, ?args, ?cwd, "ProcessRunner::run: called");
        let child = tokio::process::Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => {
                debug!(status = ?output.status, "ProcessRunner::run: command completed");
                output
            }
            Ok(Err(e)) => {
                debug!(%e, "ProcessRunner::run: failed to spawn");
                return Err(ToolError::Spawn {
                    program: program.to_string(),
                    source: e,
                });
            }
            Err(_) => {
                debug!("ProcessRunner::run: command timed out");
                return Err(ToolError::CommandTimeout {
                    program: program.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(stdout_len = %stdout.len(), stderr_len = %stderr.len(), "ProcessRunner::run: output lengths");

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: truncate_tail(&stdout, self.max_output_chars),
            stderr: truncate_tail(&stderr, self.max_output_chars),
        })
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::from_config(&ProcessConfig::default())
    }
}

/// Keep the last `max_chars` characters; build and test summaries live at the end
pub fn truncate_tail(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }

    debug!(%total, %max_chars, "truncate_tail: truncating long output");
    let skip = total - max_chars;
    let start = text.char_indices().nth(skip).map(|(i, _)| i).unwrap_or(text.len());
    format!("[truncated, {} chars total]...\n{}", total, &text[start..])
}
