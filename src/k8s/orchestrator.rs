/// Ordered apply/delete of a resource set
///
/// Start applies the namespace manifest first and stops there if it fails
/// for real. Every dependent is then applied best-effort. Stop deletes the
/// dependents in reverse best-effort and deletes the namespace last. A
/// missing kubectl clears `overall_success` but only ends the sequence when
/// it hits the namespace apply.
use std::time::Duration;
use tracing::{error, info, warn};

use super::kubectl::{CommandRunner, KubectlCommand};
use super::resources::ResourceSet;
use crate::utils::command::CommandOutcome;

/// Propagation wait after the namespace apply
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Aggregate outcome of one start or stop run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationResult {
    /// The sequence ran to completion with kubectl available. Rejected
    /// dependents do not clear it.
    pub overall_success: bool,
    /// Invoked manifests in call order
    pub outcomes: Vec<(String, CommandOutcome)>,
    /// Manifests skipped because the file was absent
    pub skipped: Vec<String>,
}

impl OrchestrationResult {
    fn new() -> Self {
        Self {
            overall_success: true,
            outcomes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn aborted(mut self) -> Self {
        self.overall_success = false;
        self
    }

    /// Invoked manifests whose command did not succeed
    pub fn failed(&self) -> impl Iterator<Item = &(String, CommandOutcome)> {
        self.outcomes.iter().filter(|(_, outcome)| !outcome.success())
    }

    #[cfg(test)]
    pub fn outcome(&self, manifest: &str) -> Option<&CommandOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == manifest)
            .map(|(_, outcome)| outcome)
    }
}

/// What a failed step means for the rest of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailurePolicy {
    /// Hard precondition: a real failure ends the sequence
    Abort,
    /// Independent sibling: record the failure and move on
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Completed,
    Failed,
    Abort,
}

/// Drives start/stop sequences through a [`CommandRunner`]
pub struct Orchestrator<'a, R> {
    runner: &'a R,
    settle_delay: Duration,
}

impl<'a, R: CommandRunner> Orchestrator<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Apply the namespace manifest, then every dependent in declared order
    pub async fn start_all(&self, set: &ResourceSet, dry_run: bool) -> OrchestrationResult {
        info!("--- Starting resources in namespace {} ---", set.namespace());
        let mut result = OrchestrationResult::new();

        let ns_file = set.namespace_manifest();
        let ns_path = set.manifest_path(ns_file);
        info!("Applying namespace manifest: {}", ns_path.display());
        let step = self
            .step(
                &mut result,
                ns_file,
                KubectlCommand::apply(&ns_path),
                dry_run,
                FailurePolicy::Abort,
            )
            .await;
        if step != Step::Completed {
            error!(
                "Failed to create namespace {}. Aborting start.",
                set.namespace()
            );
            return result.aborted();
        }

        if !dry_run && !self.settle_delay.is_zero() {
            info!(
                "Waiting {}s for namespace {} to propagate...",
                self.settle_delay.as_secs_f32(),
                set.namespace()
            );
            tokio::time::sleep(self.settle_delay).await;
        }

        for file in set.dependents() {
            let path = set.manifest_path(file);
            if !path.exists() {
                warn!("Manifest '{}' not found. Skipping.", path.display());
                result.skipped.push(file.clone());
                continue;
            }

            info!("Applying {}...", file);
            let command = KubectlCommand::apply(&path).namespace(set.namespace());
            let step = self
                .step(&mut result, file, command, dry_run, FailurePolicy::Continue)
                .await;
            if step == Step::Failed {
                error!(
                    "Failed to apply {}. Remaining resources may be affected.",
                    file
                );
            }
        }

        self.report("Start", &result);
        result
    }

    /// Delete dependents in reverse order, then the namespace manifest
    pub async fn stop_all(&self, set: &ResourceSet, dry_run: bool) -> OrchestrationResult {
        info!("--- Stopping resources in namespace {} ---", set.namespace());
        let mut result = OrchestrationResult::new();

        for file in set.dependents().iter().rev() {
            let path = set.manifest_path(file);
            if !path.exists() {
                warn!("Manifest '{}' not found. Skipping.", path.display());
                result.skipped.push(file.clone());
                continue;
            }

            info!("Deleting {}...", file);
            let command = KubectlCommand::delete(&path).namespace(set.namespace());
            let step = self
                .step(&mut result, file, command, dry_run, FailurePolicy::Continue)
                .await;
            if step == Step::Failed {
                error!(
                    "Failed to delete {}. Continuing with the remaining resources.",
                    file
                );
            }
        }

        let ns_file = set.namespace_manifest();
        info!("Deleting namespace: {}", set.namespace());
        let command = KubectlCommand::delete(&set.manifest_path(ns_file));
        let step = self
            .step(&mut result, ns_file, command, dry_run, FailurePolicy::Continue)
            .await;
        if step == Step::Failed {
            error!(
                "Failed to delete namespace {}. It may need to be deleted manually.",
                set.namespace()
            );
        }

        self.report("Stop", &result);
        result
    }

    /// Run one command and classify it under `policy`.
    ///
    /// A dry-run step always completes and is recorded as an empty success,
    /// whatever the runner answered. A missing tool clears
    /// `overall_success` under either policy.
    async fn step(
        &self,
        result: &mut OrchestrationResult,
        file: &str,
        command: KubectlCommand,
        dry_run: bool,
        policy: FailurePolicy,
    ) -> Step {
        let outcome = self.runner.run(command.args(), dry_run).await;
        if dry_run {
            result.outcomes.push((file.to_string(), CommandOutcome::dry_run()));
            return Step::Completed;
        }

        if outcome.is_tool_missing() {
            result.overall_success = false;
        }

        let step = if outcome.success() {
            Step::Completed
        } else {
            match policy {
                FailurePolicy::Abort => Step::Abort,
                FailurePolicy::Continue => Step::Failed,
            }
        };

        result.outcomes.push((file.to_string(), outcome));
        step
    }

    fn report(&self, phase: &str, result: &OrchestrationResult) {
        let failed = result.failed().count();
        if failed == 0 && result.skipped.is_empty() {
            info!("✓ {} sequence completed", phase);
        } else {
            warn!(
                "✓ {} sequence completed ({} failed, {} skipped)",
                phase,
                failed,
                result.skipped.len()
            );
        }
    }
}
