//! Repository error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or loading typelibs
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No typelib for the namespace on the search path
    #[error("{}", not_found_message(.namespace, .version.as_deref()))]
    TypelibNotFound {
        /// Requested namespace
        namespace: String,
        /// Requested version, if any
        version: Option<String>,
    },

    /// Typelib file declares a different namespace or version than its file name
    #[error("Typelib {} declares '{found}', expected '{expected}'", .path.display())]
    NamespaceMismatch {
        /// `Namespace-Version` named by the file
        expected: String,
        /// `Namespace-Version` the typelib declares
        found: String,
        /// Typelib file
        path: PathBuf,
    },

    /// Namespace already loaded with another version
    #[error("Requiring namespace '{namespace}' version '{requested}', but '{loaded}' is already loaded")]
    VersionConflict {
        /// Namespace
        namespace: String,
        /// Version that was required
        requested: String,
        /// Version already loaded
        loaded: String,
    },

    /// Typelib content could not be decoded or is inconsistent
    #[error("Invalid typelib {source_name}: {message}")]
    InvalidTypelib {
        /// File path or in-memory label
        source_name: String,
        /// What was wrong
        message: String,
    },

    /// I/O error
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    /// Stable numeric code, reported as the third element of a failed require
    pub fn code(&self) -> i32 {
        match self {
            RepositoryError::TypelibNotFound { .. } => 1,
            RepositoryError::NamespaceMismatch { .. } => 2,
            RepositoryError::VersionConflict { .. } => 3,
            RepositoryError::InvalidTypelib { .. } => 4,
            RepositoryError::Io { .. } => 5,
        }
    }

    pub(crate) fn invalid(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        RepositoryError::InvalidTypelib {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

fn not_found_message(namespace: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!(
            "Typelib file for namespace '{}', version '{}' not found",
            namespace, version
        ),
        None => format!("Typelib file for namespace '{}' (any version) not found", namespace),
    }
}
