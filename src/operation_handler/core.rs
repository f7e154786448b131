//! Core operation handler types and dispatch.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::capabilities::Capability;
use crate::flavor::FlavorFilter;
use crate::registry::FlavorAccessRegistry;
use crate::storage::FlavorStore;
use crate::version::ApiVersion;

/// Framework-agnostic handler for flavor operations.
pub struct FlavorOperationHandler<S> {
    pub(super) registry: FlavorAccessRegistry<S>,
}

/// Types of operations supported by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlavorOperationType {
    /// Create a flavor from a `{"flavor": {...}}` document
    CreateFlavor,
    /// Show one flavor
    ShowFlavor,
    /// Detail listing of flavors
    ListFlavorsDetail,
    /// Delete a flavor
    DeleteFlavor,
    /// List a flavor's tenant grants
    ListAccess,
    /// Flavor action (`addTenantAccess` / `removeTenantAccess`)
    Action,
}

impl FlavorOperationType {
    /// Capability that must be enabled for this operation, if any.
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            FlavorOperationType::CreateFlavor | FlavorOperationType::DeleteFlavor => {
                Some(Capability::FlavorManage)
            }
            FlavorOperationType::ListAccess | FlavorOperationType::Action => {
                Some(Capability::FlavorAccess)
            }
            FlavorOperationType::ShowFlavor | FlavorOperationType::ListFlavorsDetail => None,
        }
    }
}

/// Body of a flavor action request.
///
/// ```rust
/// use flavor_access::operation_handler::FlavorAction;
/// use serde_json::json;
///
/// let action: FlavorAction =
///     serde_json::from_value(json!({"addTenantAccess": {"tenant": "fake_tenant"}})).unwrap();
/// assert_eq!(action, FlavorAction::AddTenantAccess { tenant: "fake_tenant".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub enum FlavorAction {
    AddTenantAccess { tenant: String },
    RemoveTenantAccess { tenant: String },
}

/// Structured request for a flavor operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorOperationRequest {
    /// The operation to perform
    pub operation: FlavorOperationType,
    /// Target flavor for operations on a single flavor
    pub flavor_id: Option<String>,
    /// JSON body for create and action operations
    pub data: Option<Value>,
    /// Listing criteria
    pub filter: Option<FlavorFilter>,
    /// Requested microversion, as sent by the client
    pub version: Option<String>,
    /// Request ID for tracing and correlation
    pub request_id: Option<String>,
}

/// Structured response from a flavor operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorOperationResponse {
    /// HTTP-equivalent status code
    pub status: u16,
    /// Whether the operation succeeded
    pub success: bool,
    /// Response document
    pub data: Option<Value>,
    /// Error message if the operation failed
    pub error: Option<String>,
    /// Error code for programmatic handling
    pub error_code: Option<String>,
    pub metadata: OperationMetadata,
}

/// Metadata about a flavor operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationMetadata {
    /// Request ID for tracing
    pub request_id: String,
    /// Flavor the operation targeted, if any
    pub flavor_id: Option<String>,
    /// Negotiated microversion; absent when negotiation itself failed
    pub version: Option<ApiVersion>,
    /// Number of items in the response document
    pub resource_count: Option<usize>,
    /// Whether the caller may retry the request unchanged
    pub retryable: bool,
    /// Backend hint for how long to wait before retrying
    pub retry_after: Option<Duration>,
}

impl<S: FlavorStore> FlavorOperationHandler<S> {
    /// Create a new operation handler around a registry.
    pub fn new(registry: FlavorAccessRegistry<S>) -> Self {
        Self { registry }
    }

    /// Handle a structured request.
    ///
    /// Never fails: errors are rendered into the response.
    pub async fn handle_operation(&self, request: FlavorOperationRequest) -> FlavorOperationResponse {
        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(
            "flavor operation handler processing {:?} for {:?} (request: '{}')",
            request.operation, request.flavor_id, request_id
        );

        let version = match self
            .registry
            .config()
            .versions
            .negotiate(request.version.as_deref())
        {
            Ok(version) => version,
            Err(e) => {
                warn!("version negotiation failed: {} (request: '{}')", e, request_id);
                return super::errors::create_error_response(e, request_id, None, request.flavor_id);
            }
        };

        if let Some(capability) = request.operation.required_capability() {
            if !self.registry.capabilities().contains(capability) {
                debug!(
                    "{:?} requires disabled capability {} (request: '{}')",
                    request.operation, capability, request_id
                );
                return super::errors::create_unsupported_response(
                    capability,
                    request_id,
                    version,
                    request.flavor_id,
                );
            }
        }

        let flavor_id = request.flavor_id.clone();
        let result = match request.operation {
            FlavorOperationType::CreateFlavor => {
                super::handlers::flavors::handle_create(self, request, version, &request_id).await
            }
            FlavorOperationType::ShowFlavor => {
                super::handlers::flavors::handle_show(self, request, version, &request_id).await
            }
            FlavorOperationType::ListFlavorsDetail => {
                super::handlers::flavors::handle_list_detail(self, request, version, &request_id)
                    .await
            }
            FlavorOperationType::DeleteFlavor => {
                super::handlers::flavors::handle_delete(self, request, version, &request_id).await
            }
            FlavorOperationType::ListAccess => {
                super::handlers::access::handle_list(self, request, version, &request_id).await
            }
            FlavorOperationType::Action => {
                super::handlers::access::handle_action(self, request, version, &request_id).await
            }
        };

        match &result {
            Ok(response) => {
                debug!(
                    "flavor operation completed with status {} (request: '{}')",
                    response.status, request_id
                );
            }
            Err(e) => {
                warn!("flavor operation failed: {} (request: '{}')", e, request_id);
            }
        }

        result.unwrap_or_else(|e| {
            super::errors::create_error_response(e, request_id, Some(version), flavor_id)
        })
    }

    /// Get access to the underlying registry.
    pub fn registry(&self) -> &FlavorAccessRegistry<S> {
        &self.registry
    }
}
