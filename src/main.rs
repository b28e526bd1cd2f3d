/// stackctl - ordered Kubernetes manifest lifecycle
///
/// Applies a namespace manifest and its dependent manifests in declared order,
/// deletes them in reverse, and reports pod status in the namespace.
mod config;
mod k8s;
mod menu;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::k8s::kubectl::CommandRunner;
use crate::k8s::{Kubectl, OrchestrationResult, Orchestrator, ResourceSet, StatusReporter};

#[derive(Parser)]
#[command(name = "stackctl")]
#[command(about = "Start, stop and inspect an ordered set of Kubernetes manifests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the namespace, then every dependent manifest
    Start {
        /// Print the commands without executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete dependent manifests in reverse order, then the namespace
    Stop {
        /// Print the commands without executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show pod status in the namespace
    Status,

    /// Generate example configuration file
    Init,

    /// Interactive menu (default)
    Menu,
}

/// Loaded configuration shared by every command
pub struct App<R = Kubectl> {
    set: ResourceSet,
    runner: R,
    settle_delay: Duration,
}

impl App {
    fn load(cli: &Cli) -> Result<Self> {
        let config = Config::from_file(&cli.config).context("Failed to load configuration")?;
        let set = config.resource_set()?;

        info!(
            "Namespace: {} ({} manifests in {})",
            set.namespace(),
            set.manifest_count(),
            set.directory().display()
        );
        debug!("Manifest order: {}", set.iter().collect::<Vec<_>>().join(", "));

        Ok(Self {
            runner: config.kubectl(),
            settle_delay: config.settle_delay(),
            set,
        })
    }
}

impl<R: CommandRunner> App<R> {
    fn orchestrator(&self) -> Orchestrator<'_, R> {
        Orchestrator::new(&self.runner).with_settle_delay(self.settle_delay)
    }

    /// Start all resources; a real run is followed by a pod status report
    pub async fn start(&self, dry_run: bool) -> Result<()> {
        let result = self.orchestrator().start_all(&self.set, dry_run).await;
        self.finish("Start", result, dry_run).await
    }

    /// Stop all resources; a real run is followed by a pod status report
    pub async fn stop(&self, dry_run: bool) -> Result<()> {
        let result = self.orchestrator().stop_all(&self.set, dry_run).await;
        self.finish("Stop", result, dry_run).await
    }

    async fn finish(&self, phase: &str, result: OrchestrationResult, dry_run: bool) -> Result<()> {
        for (manifest, outcome) in result.failed() {
            warn!("  {} failed: {}", manifest, outcome.stderr.trim());
        }

        let status = if dry_run {
            Ok(())
        } else {
            self.show_status().await
        };

        if !result.overall_success {
            if let Err(e) = status {
                error!("{:#}", e);
            }
            anyhow::bail!("{} sequence aborted", phase);
        }
        status
    }

    /// Show pod status in the namespace
    pub async fn show_status(&self) -> Result<()> {
        let stdout = StatusReporter::pod_status(&self.runner, &self.set)
            .await
            .into_result()
            .context("Could not get pod status")?;

        println!("{}", stdout.trim_end());
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stackctl={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(&cli).await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let app = match cli.command {
        Some(Commands::Init) => return init_config(cli).await,
        _ => App::load(cli)?,
    };

    match cli.command {
        Some(Commands::Start { dry_run }) => app.start(dry_run).await,
        Some(Commands::Stop { dry_run }) => app.stop(dry_run).await,
        Some(Commands::Status) => app.show_status().await,
        Some(Commands::Menu) | None => menu::run(&app).await,
        Some(Commands::Init) => Ok(()),
    }
}

/// Initialize example configuration file
async fn init_config(cli: &Cli) -> Result<()> {
    if cli.config.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}",
            cli.config.display()
        );
    }

    let example_config = Config::example();
    let yaml = serde_yaml::to_string(&example_config)?;

    tokio::fs::write(&cli.config, yaml)
        .await
        .context("Failed to write configuration file")?;

    info!("Example configuration created: {}", cli.config.display());
    info!("");
    info!("Next steps:");
    info!("  1. Put your manifests in the resource directory, namespace manifest first");
    info!("  2. List them in dependency order under `resources`");
    info!("  3. Preview the sequence:");
    info!("     stackctl start --dry-run");

    Ok(())
}
