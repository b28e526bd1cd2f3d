/// Command execution utilities for external cluster tools
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// How a single command invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Exited with status zero (or was skipped in dry-run mode)
    Succeeded,
    /// Ran and exited non-zero; `code` is `None` when killed by a signal
    Rejected { code: Option<i32> },
    /// The executable could not be located
    ToolMissing { program: String },
}

/// Result from command execution with captured output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    pub status: OutcomeStatus,
}

/// Typed failure for callers that want `?` semantics on an outcome
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{program} is not installed or not in PATH")]
    ToolMissing { program: String },

    #[error("command rejected ({}): {}", exit_label(.code), .stderr.trim())]
    Rejected { code: Option<i32>, stderr: String },
}

pub(crate) fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl CommandOutcome {
    /// Successful outcome carrying the given stdout
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            status: OutcomeStatus::Succeeded,
        }
    }

    /// Outcome reported for a command that was deliberately not executed
    pub fn dry_run() -> Self {
        Self::succeeded(String::new())
    }

    /// Outcome for a command that ran and exited non-zero
    pub fn rejected(code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: OutcomeStatus::Rejected { code },
        }
    }

    /// Outcome for an executable that could not be found
    pub fn tool_missing(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            stdout: String::new(),
            stderr: format!("{} not found", program),
            status: OutcomeStatus::ToolMissing { program },
        }
    }

    /// Create from tokio Command output
    fn from_output(output: std::process::Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if output.status.success() {
            Self {
                stdout,
                stderr,
                status: OutcomeStatus::Succeeded,
            }
        } else {
            Self::rejected(output.status.code(), stdout, stderr)
        }
    }

    /// Map a spawn failure; only `NotFound` means the tool itself is absent
    fn from_spawn_error(program: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::tool_missing(program)
        } else {
            Self::rejected(
                None,
                String::new(),
                format!("failed to execute {}: {}", program, err),
            )
        }
    }

    pub fn success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }

    pub fn is_tool_missing(&self) -> bool {
        matches!(self.status, OutcomeStatus::ToolMissing { .. })
    }

    /// Return stdout if successful, otherwise the typed failure
    pub fn into_result(self) -> Result<String, CommandError> {
        match self.status {
            OutcomeStatus::Succeeded => Ok(self.stdout),
            OutcomeStatus::Rejected { code } => Err(CommandError::Rejected {
                code,
                stderr: self.stderr,
            }),
            OutcomeStatus::ToolMissing { program } => Err(CommandError::ToolMissing { program }),
        }
    }
}

/// Builder for executing external commands with common patterns
pub struct CommandBuilder {
    program: String,
    command: Command,
}

impl CommandBuilder {
    /// Create a new command builder
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        let mut command = Command::new(&program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Self { program, command }
    }

    /// Add a single argument
    #[cfg(test)]
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.command.arg(arg);
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command.args(args);
        self
    }

    /// Set an environment variable
    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.command.env(key, val);
        self
    }

    /// Set KUBECONFIG environment variable
    pub fn kubeconfig(self, path: &Path) -> Self {
        self.env("KUBECONFIG", path)
    }

    /// Execute and capture the outcome. Never fails: spawn errors become
    /// `ToolMissing` or `Rejected` outcomes.
    pub async fn output(mut self) -> CommandOutcome {
        match self.command.output().await {
            Ok(output) => CommandOutcome::from_output(output),
            Err(e) => CommandOutcome::from_spawn_error(&self.program, e),
        }
    }
}
