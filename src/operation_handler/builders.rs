//! Request builder utilities for FlavorOperationRequest.

use serde_json::Value;

use crate::flavor::FlavorFilter;
use crate::operation_handler::core::{FlavorOperationRequest, FlavorOperationType};

impl FlavorOperationRequest {
    fn new(operation: FlavorOperationType, flavor_id: Option<String>, data: Option<Value>) -> Self {
        Self {
            operation,
            flavor_id,
            data,
            filter: None,
            version: None,
            request_id: None,
        }
    }

    /// Create a flavor from a `{"flavor": {...}}` document.
    pub fn create_flavor(data: Value) -> Self {
        Self::new(FlavorOperationType::CreateFlavor, None, Some(data))
    }

    /// Show a single flavor.
    pub fn show_flavor(flavor_id: impl Into<String>) -> Self {
        Self::new(FlavorOperationType::ShowFlavor, Some(flavor_id.into()), None)
    }

    /// Detail listing of all flavors.
    pub fn list_detail() -> Self {
        Self::new(FlavorOperationType::ListFlavorsDetail, None, None)
    }

    /// Delete a flavor.
    pub fn delete_flavor(flavor_id: impl Into<String>) -> Self {
        Self::new(FlavorOperationType::DeleteFlavor, Some(flavor_id.into()), None)
    }

    /// List a flavor's tenant grants.
    pub fn list_access(flavor_id: impl Into<String>) -> Self {
        Self::new(FlavorOperationType::ListAccess, Some(flavor_id.into()), None)
    }

    /// Run a flavor action such as `{"addTenantAccess": {"tenant": "..."}}`.
    pub fn action(flavor_id: impl Into<String>, data: Value) -> Self {
        Self::new(FlavorOperationType::Action, Some(flavor_id.into()), Some(data))
    }

    /// Request a specific microversion (`"2.7"`, `"latest"`).
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_filter(mut self, filter: FlavorFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}
