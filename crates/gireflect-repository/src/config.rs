//! Repository configuration (gireflect.toml)
//!
//! Controls where typelibs are searched for.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding extra typelib directories
pub const TYPELIB_PATH_ENV: &str = "GI_TYPELIB_PATH";

/// Well-known system typelib directories, appended when they exist
const SYSTEM_DIRS: &[&str] = &[
    "/usr/local/lib/girepository-1.0",
    "/usr/lib/girepository-1.0",
    "/usr/lib64/girepository-1.0",
    "/usr/lib/x86_64-linux-gnu/girepository-1.0",
    "/usr/lib/aarch64-linux-gnu/girepository-1.0",
];

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Typelib search configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryConfig {
    /// Directories searched first, in order
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Also search the directories listed in `GI_TYPELIB_PATH`
    #[serde(default = "default_true")]
    pub use_env: bool,

    /// Also search the system typelib directories
    #[serde(default = "default_true")]
    pub use_system: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            use_env: true,
            use_system: true,
        }
    }
}

impl RepositoryConfig {
    /// Configuration that searches exactly `paths`
    pub fn isolated(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            search_paths: paths.into_iter().collect(),
            use_env: false,
            use_system: false,
        }
    }

    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Effective search path: `GI_TYPELIB_PATH` entries, configured paths,
    /// then existing system directories
    pub fn search_path(&self) -> Vec<PathBuf> {
        let env = if self.use_env {
            std::env::var(TYPELIB_PATH_ENV).ok()
        } else {
            None
        };
        self.search_path_with(env.as_deref())
    }

    fn search_path_with(&self, env: Option<&str>) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = env
            .map(|value| {
                std::env::split_paths(value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        dirs.extend(self.search_paths.iter().cloned());
        if self.use_system {
            dirs.extend(SYSTEM_DIRS.iter().map(PathBuf::from).filter(|p| p.is_dir()));
        }

        let mut seen = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !seen.contains(&dir) {
                seen.push(dir);
            }
        }
        seen
    }
}
