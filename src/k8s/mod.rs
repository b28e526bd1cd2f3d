/// Kubernetes manifest lifecycle
pub mod kubectl;
pub mod orchestrator;
pub mod resources;
pub mod status;

#[cfg(test)]
pub mod testing;

pub use kubectl::Kubectl;
pub use orchestrator::{OrchestrationResult, Orchestrator};
pub use resources::ResourceSet;
pub use status::StatusReporter;
