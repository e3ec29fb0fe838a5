//! Shell command execution.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::shell_program;
use crate::error::{ReltrackError, Result};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr instead of inheriting them.
    pub capture: bool,
}

/// Execute a command string through the platform shell.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let (shell, flag) = shell_program();

    let mut cmd = Command::new(&shell);
    cmd.arg(flag).arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }

    tracing::debug!("Running: {}", command);
    let output = cmd.output().map_err(|_| ReltrackError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn captured() -> CommandOptions {
        CommandOptions {
            capture: true,
            ..Default::default()
        }
    }

    #[test]
    fn execute_successful_command() {
        let result = execute("echo hello", &captured()).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn execute_failing_command() {
        let result = execute("exit 3", &captured()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_passes_env() {
        let mut options = captured();
        options
            .env
            .insert("RELTRACK_TEST_VAR".to_string(), "value".to_string());
        let result = execute("echo $RELTRACK_TEST_VAR", &options).unwrap();
        assert_eq!(result.stdout.trim(), "value");
    }

    #[test]
    fn execute_in_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut options = captured();
        options.cwd = Some(temp.path().to_path_buf());
        let result = execute("pwd", &options).unwrap();
        let expected = temp.path().canonicalize().unwrap();
        let actual = std::path::PathBuf::from(result.stdout.trim())
            .canonicalize()
            .unwrap();
        assert_eq!(actual, expected);
    }
}
