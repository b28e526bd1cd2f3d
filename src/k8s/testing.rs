/// Recording command runner for sequencing tests
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use tokio::time::Instant;

use super::kubectl::CommandRunner;
use crate::utils::command::CommandOutcome;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    pub dry_run: bool,
    pub at: Instant,
}

impl Invocation {
    pub fn verb(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// File name passed with `-f`, if any
    pub fn manifest(&self) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == "-f")?;
        let path = self.args.get(pos + 1)?;
        Path::new(path).file_name()?.to_str()
    }

    /// Namespace passed with `-n`, if any
    pub fn namespace(&self) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == "-n")?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

/// Records every call and answers with scripted outcomes keyed by manifest
/// file name. Scripted outcomes are returned for dry calls too, so callers
/// can be checked against a runner that misreports. Unscripted calls
/// succeed.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    scripted: HashMap<String, CommandOutcome>,
    tool_missing: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any invocation touching `manifest`
    pub fn fail_on(self, manifest: &str) -> Self {
        let outcome =
            CommandOutcome::rejected(Some(1), "", format!("error: rejected {}", manifest));
        self.answer(manifest, outcome)
    }

    /// Report kubectl as missing for invocations touching `manifest`
    pub fn tool_missing_on(self, manifest: &str) -> Self {
        self.answer(manifest, CommandOutcome::tool_missing("kubectl"))
    }

    fn answer(mut self, manifest: &str, outcome: CommandOutcome) -> Self {
        self.scripted.insert(manifest.to_string(), outcome);
        self
    }

    /// Behave as if kubectl is not installed
    pub fn without_tool(mut self) -> Self {
        self.tool_missing = true;
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// `(verb, manifest)` pairs in call order
    pub fn touched(&self) -> Vec<(String, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| Some((c.verb().to_string(), c.manifest()?.to_string())))
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, args: &[String], dry_run: bool) -> CommandOutcome {
        let invocation = Invocation {
            args: args.to_vec(),
            dry_run,
            at: Instant::now(),
        };
        let scripted = invocation
            .manifest()
            .and_then(|m| self.scripted.get(m))
            .cloned();
        self.calls.borrow_mut().push(invocation);

        if self.tool_missing {
            return CommandOutcome::tool_missing("kubectl");
        }
        scripted.unwrap_or_else(|| CommandOutcome::succeeded(""))
    }
}
