//! Command implementations

pub mod deps;
pub mod list;
pub mod show;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use gireflect_engine::{Gi, NamespaceHandle};
use gireflect_repository::{RepositoryConfig, TypelibRepository};

/// Namespace selection shared by every command
#[derive(Debug, Clone, Args)]
pub struct RequireArgs {
    /// Namespace to load (e.g. "GLib")
    pub namespace: String,

    /// Exact version to load; the newest on the search path otherwise
    #[arg(long = "version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Load the namespace from this directory only
    #[arg(long, value_name = "DIR")]
    pub typelib_dir: Option<PathBuf>,
}

impl RequireArgs {
    /// Arguments for `namespace` with no version or private directory
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            version: None,
            typelib_dir: None,
        }
    }

    /// Load the selected namespace through `gi`
    pub fn require(&self, gi: &Gi) -> anyhow::Result<NamespaceHandle> {
        gi.require(&self.namespace, self.version.as_deref(), self.typelib_dir.as_deref())
            .map_err(|failure| {
                anyhow::anyhow!("{} (error code {})", failure.message, failure.code)
            })
    }
}

/// Build the module root from an optional configuration file
pub fn open(config: Option<&Path>) -> anyhow::Result<Gi> {
    let config = match config {
        Some(path) => RepositoryConfig::from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => RepositoryConfig::default(),
    };
    let repository = TypelibRepository::new(&config);
    tracing::debug!(search_path = ?repository.search_path(), "repository ready");
    Ok(Gi::new(Arc::new(repository)))
}
