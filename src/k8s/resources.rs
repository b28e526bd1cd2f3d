/// Ordered set of manifests managed as one unit
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceSetError {
    #[error("namespace cannot be empty")]
    EmptyNamespace,

    #[error("at least one resource is required; the first must define the namespace")]
    NoResources,

    #[error("resource entry {index} has an empty file name")]
    EmptyFileName { index: usize },

    #[error("resource directory is not valid UTF-8: {}", .0.display())]
    NonUtf8Directory(PathBuf),
}

/// Manifests in dependency order.
///
/// The namespace manifest is held apart from its dependents, so a set
/// without one cannot be built. It is applied before and deleted after
/// every dependent. Every manifest path is valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSet {
    namespace: String,
    directory: PathBuf,
    namespace_manifest: String,
    dependents: Vec<String>,
}

impl ResourceSet {
    pub fn new(
        namespace: impl Into<String>,
        directory: impl Into<PathBuf>,
        resources: Vec<String>,
    ) -> Result<Self, ResourceSetError> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(ResourceSetError::EmptyNamespace);
        }

        if let Some(index) = resources.iter().position(|r| r.trim().is_empty()) {
            return Err(ResourceSetError::EmptyFileName { index });
        }

        let directory = directory.into();
        if directory.to_str().is_none() {
            return Err(ResourceSetError::NonUtf8Directory(directory));
        }

        let mut resources = resources.into_iter();
        let namespace_manifest = resources.next().ok_or(ResourceSetError::NoResources)?;

        Ok(Self {
            namespace,
            directory,
            namespace_manifest,
            dependents: resources.collect(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name of the namespace-defining manifest (position 0)
    pub fn namespace_manifest(&self) -> &str {
        &self.namespace_manifest
    }

    /// Every manifest after the namespace, in declared order
    pub fn dependents(&self) -> &[String] {
        &self.dependents
    }

    /// All manifests in declared order, namespace first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        std::iter::once(self.namespace_manifest.as_str())
            .chain(self.dependents.iter().map(String::as_str))
    }

    pub fn manifest_count(&self) -> usize {
        self.dependents.len() + 1
    }

    /// Resolve a manifest file name against the resource directory
    pub fn manifest_path(&self, file: &str) -> PathBuf {
        self.directory.join(file)
    }
}
