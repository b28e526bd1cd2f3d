/// Configuration management for stackctl
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::k8s::orchestrator::DEFAULT_SETTLE_DELAY;
use crate::k8s::{Kubectl, ResourceSet};

/// Manifest stack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Namespace every dependent manifest is applied into
    pub namespace: String,

    /// Directory the manifest file names are resolved against
    pub resource_directory: PathBuf,

    /// Manifest file names in dependency order; the first defines the namespace
    pub resources: Vec<String>,

    /// kubectl executable (name on PATH or absolute path)
    #[serde(default = "default_kubectl")]
    pub kubectl: String,

    /// Kubeconfig exported as KUBECONFIG (falls back to kubectl's own lookup)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Seconds to wait after applying the namespace manifest
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_settle_delay_secs() -> u64 {
    DEFAULT_SETTLE_DELAY.as_secs()
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Configuration file '{}' not found", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.kubectl.trim().is_empty() {
            anyhow::bail!("kubectl cannot be empty");
        }

        self.resource_set()?;
        Ok(())
    }

    /// Build the immutable resource set
    pub fn resource_set(&self) -> anyhow::Result<ResourceSet> {
        ResourceSet::new(
            self.namespace.clone(),
            self.resource_directory.clone(),
            self.resources.clone(),
        )
        .context("Invalid resource configuration")
    }

    /// Command runner configured for this stack
    pub fn kubectl(&self) -> Kubectl {
        Kubectl::new(self.kubectl.clone()).with_kubeconfig(self.kubeconfig.clone())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Generate an example configuration file
    pub fn example() -> Self {
        Self {
            namespace: "observability".to_string(),
            resource_directory: PathBuf::from("k8s"),
            resources: vec![
                "namespace.yaml".to_string(),
                "prometheus-config.yaml".to_string(),
                "prometheus-deployment.yaml".to_string(),
                "prometheus-service.yaml".to_string(),
                "grafana-deployment.yaml".to_string(),
                "grafana-service.yaml".to_string(),
            ],
            kubectl: default_kubectl(),
            kubeconfig: None,
            settle_delay_secs: default_settle_delay_secs(),
        }
    }
}
