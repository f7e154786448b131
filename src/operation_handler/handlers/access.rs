//! Flavor access handlers: access listing and add/remove tenant actions.

use log::debug;

use crate::error::{AccessError, AccessResult};
use crate::operation_handler::core::{
    FlavorAction, FlavorOperationHandler, FlavorOperationRequest, FlavorOperationResponse,
};
use crate::operation_handler::handlers::flavors::{success, target_flavor};
use crate::operation_handler::views;
use crate::storage::FlavorStore;
use crate::version::ApiVersion;

/// Handle listing a flavor's grants.
pub async fn handle_list<S: FlavorStore>(
    handler: &FlavorOperationHandler<S>,
    request: FlavorOperationRequest,
    version: ApiVersion,
    request_id: &str,
) -> AccessResult<FlavorOperationResponse> {
    let flavor_id = target_flavor(&request)?;
    let grants = handler.registry().list_access(&flavor_id).await?;

    Ok(success(
        200,
        Some(views::access_document(&grants)),
        request_id,
        version,
        request.flavor_id,
        Some(grants.len()),
    ))
}

/// Handle `addTenantAccess` / `removeTenantAccess`.
///
/// Both respond with the flavor's access list after the change, taken under
/// the same per-flavor lock as the change itself.
pub async fn handle_action<S: FlavorStore>(
    handler: &FlavorOperationHandler<S>,
    request: FlavorOperationRequest,
    version: ApiVersion,
    request_id: &str,
) -> AccessResult<FlavorOperationResponse> {
    let flavor_id = target_flavor(&request)?;
    let data = request
        .data
        .ok_or_else(|| AccessError::invalid_request("Missing data for action"))?;
    let action: FlavorAction = serde_json::from_value(data)
        .map_err(|e| AccessError::invalid_request(format!("Unrecognized flavor action: {}", e)))?;
    debug!("flavor {} action {:?} (request: '{}')", flavor_id, action, request_id);

    let registry = handler.registry();
    let grants = match &action {
        FlavorAction::AddTenantAccess { tenant } => {
            registry
                .add_tenant_access_and_list(&flavor_id, tenant, version)
                .await?
        }
        FlavorAction::RemoveTenantAccess { tenant } => {
            registry
                .remove_tenant_access_and_list(&flavor_id, tenant)
                .await?
        }
    };

    Ok(success(
        200,
        Some(views::access_document(&grants)),
        request_id,
        version,
        request.flavor_id,
        Some(grants.len()),
    ))
}
