/// kubectl invocation: argument vectors and the command runner seam
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::utils::command::{exit_label, CommandBuilder, CommandOutcome, OutcomeStatus};

/// Executes one cluster-management invocation.
///
/// Ordinary command failures are reported through the returned
/// [`CommandOutcome`], never as an error. With `dry_run` set no external
/// effect may happen and the outcome must be an empty success.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, args: &[String], dry_run: bool) -> CommandOutcome;
}

/// Argument vector for a single kubectl call, verb first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubectlCommand {
    args: Vec<String>,
}

impl KubectlCommand {
    /// `apply -f <manifest>`
    pub fn apply(manifest: &Path) -> Self {
        Self::with_file("apply", manifest)
    }

    /// `delete -f <manifest>`
    pub fn delete(manifest: &Path) -> Self {
        Self::with_file("delete", manifest)
    }

    /// `get pods`
    pub fn get_pods() -> Self {
        Self {
            args: vec!["get".to_string(), "pods".to_string()],
        }
    }

    /// Paths built from a `ResourceSet` are always UTF-8, so the lossy
    /// conversion never alters them.
    fn with_file(verb: &str, manifest: &Path) -> Self {
        Self {
            args: vec![
                verb.to_string(),
                "-f".to_string(),
                manifest.to_string_lossy().into_owned(),
            ],
        }
    }

    /// Scope the command with `-n <namespace>`
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.args.push("-n".to_string());
        self.args.push(namespace.to_string());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Runs commands through the kubectl binary
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
    kubeconfig: Option<PathBuf>,
}

impl Kubectl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            kubeconfig: None,
        }
    }

    /// Export KUBECONFIG for every invocation
    pub fn with_kubeconfig(mut self, path: Option<PathBuf>) -> Self {
        self.kubeconfig = path;
        self
    }

    fn log_outcome(&self, outcome: &CommandOutcome) {
        match &outcome.status {
            OutcomeStatus::Succeeded => {
                if !outcome.stdout.trim().is_empty() {
                    info!("{}", outcome.stdout.trim_end());
                }
                if !outcome.stderr.trim().is_empty() {
                    warn!("Warnings:\n{}", outcome.stderr.trim_end());
                }
            }
            OutcomeStatus::Rejected { code } => {
                error!("Command failed ({})", exit_label(code));
                if !outcome.stdout.trim().is_empty() {
                    error!("stdout:\n{}", outcome.stdout.trim_end());
                }
                error!("stderr:\n{}", outcome.stderr.trim_end());
            }
            OutcomeStatus::ToolMissing { program } => {
                error!(
                    "'{}' was not found. Make sure it is installed and in your PATH \
                     (https://kubernetes.io/docs/tasks/tools/)",
                    program
                );
            }
        }
    }
}

impl CommandRunner for Kubectl {
    async fn run(&self, args: &[String], dry_run: bool) -> CommandOutcome {
        info!("Executing: {} {}", self.program, args.join(" "));
        if dry_run {
            info!("  (dry-run: command not executed)");
            return CommandOutcome::dry_run();
        }

        let mut builder = CommandBuilder::new(&self.program).args(args);
        if let Some(path) = &self.kubeconfig {
            builder = builder.kubeconfig(path);
        }

        let outcome = builder.output().await;
        self.log_outcome(&outcome);
        outcome
    }
}
