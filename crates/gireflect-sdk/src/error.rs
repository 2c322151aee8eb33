//! Error types for the host boundary
//!
//! Mirrors the two error classes a scripting host distinguishes: argument
//! errors raised against a specific call position, and operations the target
//! value does not support at all.

/// Result type for host-visible operations
pub type HostResult<T> = Result<T, HostError>;

/// Errors raised back to the host caller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// Invalid argument value at a call position (1-based, receiver included)
    #[error("bad argument #{position} ({message})")]
    ArgumentError {
        /// Argument position
        position: usize,
        /// Description of what was wrong with the value
        message: String,
    },

    /// Argument of the wrong dynamic type
    #[error("bad argument #{position} ({expected} expected, got {got})")]
    TypeMismatch {
        /// Argument position
        position: usize,
        /// Expected type name
        expected: &'static str,
        /// Actual type name
        got: &'static str,
    },

    /// Length probe on a value that defines no length
    #[error("attempt to get length of a {0} value")]
    NoLength(&'static str),
}

impl HostError {
    /// Build an argument error for `position`
    pub fn argument(position: usize, message: impl Into<String>) -> Self {
        HostError::ArgumentError {
            position,
            message: message.into(),
        }
    }

    /// Argument position this error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            HostError::ArgumentError { position, .. } | HostError::TypeMismatch { position, .. } => {
                Some(*position)
            }
            HostError::NoLength(_) => None,
        }
    }
}
