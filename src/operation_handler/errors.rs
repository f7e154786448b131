//! Error response creation shared by all handlers.

use crate::capabilities::Capability;
use crate::error::AccessError;
use crate::operation_handler::core::{FlavorOperationResponse, OperationMetadata};
use crate::version::ApiVersion;

/// Create an error response from an AccessError.
pub fn create_error_response(
    error: AccessError,
    request_id: String,
    version: Option<ApiVersion>,
    flavor_id: Option<String>,
) -> FlavorOperationResponse {
    FlavorOperationResponse {
        status: error.status_code(),
        success: false,
        data: None,
        error: Some(error.to_string()),
        error_code: Some(error.kind().code().to_string()),
        metadata: OperationMetadata {
            request_id,
            flavor_id,
            version,
            resource_count: None,
            retryable: error.is_retryable(),
            retry_after: error.retry_after(),
        },
    }
}

/// Create a response for an operation whose capability is not enabled.
///
/// Disabled operations look like unknown routes, hence 404.
pub fn create_unsupported_response(
    capability: Capability,
    request_id: String,
    version: ApiVersion,
    flavor_id: Option<String>,
) -> FlavorOperationResponse {
    FlavorOperationResponse {
        status: 404,
        success: false,
        data: None,
        error: Some(format!("Capability '{}' is not enabled", capability)),
        error_code: Some("UNSUPPORTED_OPERATION".to_string()),
        metadata: OperationMetadata {
            request_id,
            flavor_id,
            version: Some(version),
            resource_count: None,
            retryable: false,
            retry_after: None,
        },
    }
}
