//! Require failures

use gireflect_repository::RepositoryError;
use thiserror::Error;

/// Failed `require`, reported to the host as `(false, message, code)`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequireFailure {
    /// Human-readable reason, naming the namespace
    pub message: String,
    /// Nonzero error code
    pub code: i32,
}

impl From<RepositoryError> for RequireFailure {
    fn from(error: RepositoryError) -> Self {
        Self {
            message: error.to_string(),
            code: error.code(),
        }
    }
}
