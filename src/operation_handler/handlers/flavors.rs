//! Flavor directory handlers: create, show, detail listing, delete.

use serde_json::Value;

use crate::error::{AccessError, AccessResult};
use crate::flavor::{FlavorFilter, FlavorId, FlavorSpec};
use crate::operation_handler::core::{
    FlavorOperationHandler, FlavorOperationRequest, FlavorOperationResponse, OperationMetadata,
};
use crate::operation_handler::views;
use crate::storage::FlavorStore;
use crate::version::ApiVersion;

pub(crate) fn success(
    status: u16,
    data: Option<Value>,
    request_id: &str,
    version: ApiVersion,
    flavor_id: Option<String>,
    resource_count: Option<usize>,
) -> FlavorOperationResponse {
    FlavorOperationResponse {
        status,
        success: true,
        data,
        error: None,
        error_code: None,
        metadata: OperationMetadata {
            request_id: request_id.to_string(),
            flavor_id,
            version: Some(version),
            resource_count,
            retryable: false,
            retry_after: None,
        },
    }
}

/// Parse the target flavor id of a request.
pub(crate) fn target_flavor(request: &FlavorOperationRequest) -> AccessResult<FlavorId> {
    let raw = request
        .flavor_id
        .as_deref()
        .ok_or_else(|| AccessError::invalid_request("Missing flavor id"))?;
    FlavorId::new(raw)
        .map_err(|_| AccessError::invalid_request(format!("Invalid flavor id '{}'", raw)))
}

/// Handle flavor creation.
pub async fn handle_create<S: FlavorStore>(
    handler: &FlavorOperationHandler<S>,
    request: FlavorOperationRequest,
    version: ApiVersion,
    request_id: &str,
) -> AccessResult<FlavorOperationResponse> {
    let mut data = request
        .data
        .ok_or_else(|| AccessError::invalid_request("Missing data for create operation"))?;
    let body = data
        .get_mut("flavor")
        .map(Value::take)
        .ok_or_else(|| AccessError::invalid_spec("Missing 'flavor' object in request body"))?;
    let spec: FlavorSpec =
        serde_json::from_value(body).map_err(|e| AccessError::invalid_spec(e.to_string()))?;

    let flavor = handler.registry().create_flavor(spec).await?;
    let document = views::flavor_document(&flavor, handler.registry().capabilities());

    Ok(success(
        200,
        Some(document),
        request_id,
        version,
        Some(flavor.id.to_string()),
        Some(1),
    ))
}

/// Handle showing one flavor.
pub async fn handle_show<S: FlavorStore>(
    handler: &FlavorOperationHandler<S>,
    request: FlavorOperationRequest,
    version: ApiVersion,
    request_id: &str,
) -> AccessResult<FlavorOperationResponse> {
    let flavor_id = target_flavor(&request)?;
    let flavor = handler.registry().show_flavor(&flavor_id).await?;
    let document = views::flavor_document(&flavor, handler.registry().capabilities());

    Ok(success(
        200,
        Some(document),
        request_id,
        version,
        request.flavor_id,
        Some(1),
    ))
}

/// Handle the detail listing.
pub async fn handle_list_detail<S: FlavorStore>(
    handler: &FlavorOperationHandler<S>,
    request: FlavorOperationRequest,
    version: ApiVersion,
    request_id: &str,
) -> AccessResult<FlavorOperationResponse> {
    let filter = request.filter.unwrap_or_else(FlavorFilter::new);
    let flavors = handler.registry().list_flavors(&filter).await?;
    let document = views::flavors_document(&flavors, handler.registry().capabilities());

    Ok(success(
        200,
        Some(document),
        request_id,
        version,
        None,
        Some(flavors.len()),
    ))
}

/// Handle flavor deletion.
pub async fn handle_delete<S: FlavorStore>(
    handler: &FlavorOperationHandler<S>,
    request: FlavorOperationRequest,
    version: ApiVersion,
    request_id: &str,
) -> AccessResult<FlavorOperationResponse> {
    let flavor_id = target_flavor(&request)?;
    handler.registry().delete_flavor(&flavor_id).await?;

    Ok(success(202, None, request_id, version, request.flavor_id, None))
}
