//! Storage-specific error types.
//!
//! These errors describe failures of the persistence layer itself. They carry
//! no access-control meaning: a missing flavor is `Ok(None)` from storage, not
//! an error. The registry surfaces every storage error as a retryable
//! "unavailable" outcome.

use std::fmt;
use std::time::Duration;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Storage backend is temporarily unavailable.
    Unavailable {
        message: String,
        retry_after: Option<Duration>,
    },

    /// The operation did not complete within the allotted time.
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Generic internal storage error.
    Internal {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Create an unavailable error without a retry hint.
    pub fn unavailable(message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create an unavailable error telling the caller when to retry.
    pub fn unavailable_for(message: impl Into<String>, retry_after: Duration) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            retry_after: Some(retry_after),
        }
    }

    /// Create an internal error without an underlying source.
    pub fn internal(message: impl Into<String>) -> Self {
        StorageError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Suggested delay before retrying, when the backend provided one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            StorageError::Unavailable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable {
                message,
                retry_after,
            } => {
                if let Some(duration) = retry_after {
                    write!(
                        f,
                        "Storage unavailable: {} (retry after {:?})",
                        message, duration
                    )
                } else {
                    write!(f, "Storage unavailable: {}", message)
                }
            }
            StorageError::Timeout {
                operation,
                duration,
            } => {
                write!(
                    f,
                    "Storage operation '{}' timed out after {:?}",
                    operation, duration
                )
            }
            StorageError::Internal { message, .. } => {
                write!(f, "Internal storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Internal {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}
