//! Single-shot external process execution.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Captured output of a process that exited successfully.
///
/// A non-empty `stderr` here is advisory, not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}", exit_description(.code))]
    Exited {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("`{command}` timed out after {}ms", .after.as_millis())]
    TimedOut { command: String, after: Duration },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl ProcessError {
    /// Standard output captured before the failure, if any.
    pub fn stdout(&self) -> &str {
        match self {
            ProcessError::Exited { stdout, .. } => stdout,
            _ => "",
        }
    }

    /// Standard error captured before the failure, if any.
    pub fn stderr(&self) -> &str {
        match self {
            ProcessError::Exited { stderr, .. } => stderr,
            _ => "",
        }
    }
}

/// Runs a command line in a working directory and waits for it to exit.
///
/// Implementations must treat a nonzero exit as an error.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &str, cwd: &Path) -> Result<ProcessOutput, ProcessError>;
}

/// Runs commands through `sh -c` with an optional upper bound on run time.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    timeout: Option<Duration>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(&self, command: &str, cwd: &Path) -> Result<ProcessOutput, ProcessError> {
        debug!(command, cwd = %cwd.display(), "spawning process");

        let mut cmd = Command::new("sh");
        cmd
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            // The timeout drops the future, which must take the process with it.
            .kill_on_drop(true);
        let output = cmd.output();

        let output = match self.timeout {
            Some(after) => tokio::time::timeout(after, output)
                .await
                .map_err(|_| ProcessError::TimedOut {
                    command: command.to_string(),
                    after,
                })?,
            None => output.await,
        }
        .map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(command, status = ?output.status.code(), "process exited");

        if !output.status.success() {
            return Err(ProcessError::Exited {
                command: command.to_string(),
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}
