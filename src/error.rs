//! Error types for flavor access operations.
//!
//! Every registry operation returns an [`AccessResult`]. The variants of
//! [`AccessError`] are fine-grained so callers can render precise messages,
//! while [`AccessError::kind`] collapses them onto the small set of outcome
//! kinds that a transport layer needs to pick a status code.

use std::time::Duration;

use crate::flavor::FlavorId;
use crate::storage::StorageError;
use crate::version::ApiVersion;

/// Main error type for flavor access operations.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The referenced flavor does not exist
    #[error("Flavor {flavor_id} could not be found")]
    FlavorNotFound { flavor_id: FlavorId },

    /// The flavor exists but the tenant holds no grant on it
    #[error("Flavor access not found for {flavor_id} / {tenant_id} combination")]
    GrantNotFound {
        flavor_id: FlavorId,
        tenant_id: String,
    },

    /// A flavor with the same id or name already exists
    #[error("Flavor with {field} {value} already exists")]
    FlavorExists { field: &'static str, value: String },

    /// The tenant already holds a grant on the flavor
    #[error("Flavor access already exists for flavor {flavor_id} and project {tenant_id} combination")]
    GrantExists {
        flavor_id: FlavorId,
        tenant_id: String,
    },

    /// Explicit grants were requested on a public flavor under a protocol
    /// version that forbids them
    #[error("Can not add access to a public flavor {flavor_id} (version {version})")]
    PublicFlavorConflict {
        flavor_id: FlavorId,
        version: ApiVersion,
    },

    /// Malformed flavor creation input
    #[error("Invalid flavor specification: {message}")]
    InvalidSpec { message: String },

    /// Storage backend failed transiently; the caller may retry
    #[error("{0}")]
    Unavailable(#[from] StorageError),

    /// The requested protocol version is outside the supported range
    #[error("Version {requested} is not supported by the API (supported range {min} - {max})")]
    UnsupportedVersion {
        requested: String,
        min: ApiVersion,
        max: ApiVersion,
    },

    /// Request body or parameters could not be understood
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Coarse classification of an [`AccessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Duplicate,
    Conflict,
    InvalidSpec,
    Unavailable,
    Unsupported,
    BadRequest,
}

impl ErrorKind {
    /// Stable machine-readable code for the kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Duplicate => "DUPLICATE",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidSpec => "INVALID_SPEC",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::Unsupported => "UNSUPPORTED_VERSION",
            ErrorKind::BadRequest => "INVALID_REQUEST",
        }
    }
}

impl AccessError {
    /// Create a flavor-not-found error.
    pub fn flavor_not_found(flavor_id: &FlavorId) -> Self {
        Self::FlavorNotFound {
            flavor_id: flavor_id.clone(),
        }
    }

    /// Create an invalid specification error.
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Outcome kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::FlavorNotFound { .. } | AccessError::GrantNotFound { .. } => {
                ErrorKind::NotFound
            }
            AccessError::FlavorExists { .. } | AccessError::GrantExists { .. } => {
                ErrorKind::Duplicate
            }
            AccessError::PublicFlavorConflict { .. } => ErrorKind::Conflict,
            AccessError::InvalidSpec { .. } => ErrorKind::InvalidSpec,
            AccessError::Unavailable(_) => ErrorKind::Unavailable,
            AccessError::UnsupportedVersion { .. } => ErrorKind::Unsupported,
            AccessError::InvalidRequest { .. } => ErrorKind::BadRequest,
        }
    }

    /// Whether the caller may retry the request unchanged.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Unavailable
    }

    /// Retry delay suggested by the storage backend, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AccessError::Unavailable(storage) => storage.retry_after(),
            _ => None,
        }
    }

    /// HTTP status code equivalent of this error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Duplicate | ErrorKind::Conflict => 409,
            ErrorKind::InvalidSpec | ErrorKind::BadRequest => 400,
            ErrorKind::Unavailable => 503,
            ErrorKind::Unsupported => 406,
        }
    }
}

/// Result type alias for flavor access operations.
pub type AccessResult<T> = Result<T, AccessError>;
