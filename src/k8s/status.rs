/// Pod status queries
use tracing::info;

use super::kubectl::{CommandRunner, KubectlCommand};
use super::resources::ResourceSet;
use crate::utils::command::CommandOutcome;

/// Read-only view of what is running in the namespace
pub struct StatusReporter;

impl StatusReporter {
    /// List pods in the set's namespace. Always a real invocation.
    pub async fn pod_status<R: CommandRunner>(runner: &R, set: &ResourceSet) -> CommandOutcome {
        info!("--- Pod status in namespace {} ---", set.namespace());
        let command = KubectlCommand::get_pods().namespace(set.namespace());
        runner.run(command.args(), false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::testing::RecordingRunner;

    fn set() -> ResourceSet {
        ResourceSet::new("obs", "k8s", vec!["ns.yaml".to_string()]).unwrap()
    }

    #[test]
    fn test_pod_status_is_scoped_and_never_dry() {
        let runner = RecordingRunner::new();

        let outcome = tokio_test::block_on(StatusReporter::pod_status(&runner, &set()));

        assert!(outcome.success());
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, ["get", "pods", "-n", "obs"]);
        assert!(!calls[0].dry_run);
    }

    #[test]
    fn test_pod_status_surfaces_missing_tool() {
        let runner = RecordingRunner::new().without_tool();

        let outcome = tokio_test::block_on(StatusReporter::pod_status(&runner, &set()));

        assert!(outcome.is_tool_missing());
    }
}
