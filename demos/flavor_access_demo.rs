//! # Flavor Access Example
//!
//! Walks through the flavor access API through the operation handler: create a
//! private flavor, share it with a tenant, list and revoke access, and see the
//! 2.7 conflict for public flavors. Run with `RUST_LOG=debug` for registry logs.

use flavor_access::operation_handler::{FlavorOperationHandler, FlavorOperationRequest};
use flavor_access::registry::RegistryBuilder;
use flavor_access::storage::InMemoryStorage;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let registry = RegistryBuilder::new(InMemoryStorage::new()).build()?;
    let handler = FlavorOperationHandler::new(registry);

    let requests = vec![
        (
            "create private flavor",
            FlavorOperationRequest::create_flavor(json!({
                "flavor": {
                    "name": "test_flavor",
                    "ram": 1024,
                    "vcpus": 2,
                    "disk": 10,
                    "id": "10",
                    "os-flavor-access:is_public": false
                }
            })),
        ),
        (
            "add tenant",
            FlavorOperationRequest::action("10", json!({"addTenantAccess": {"tenant": "fake_tenant"}})),
        ),
        ("list access", FlavorOperationRequest::list_access("10")),
        (
            "remove tenant",
            FlavorOperationRequest::action(
                "10",
                json!({"removeTenantAccess": {"tenant": "fake_tenant"}}),
            ),
        ),
        (
            "create public flavor",
            FlavorOperationRequest::create_flavor(json!({
                "flavor": {"name": "shared", "ram": 512, "vcpus": 1, "disk": 1, "id": "11"}
            })),
        ),
        (
            "add tenant to public flavor at 2.7",
            FlavorOperationRequest::action("11", json!({"addTenantAccess": {"tenant": "fake_tenant"}}))
                .with_version("2.7"),
        ),
        ("list flavors", FlavorOperationRequest::list_detail()),
    ];

    for (label, request) in requests {
        let response = handler.handle_operation(request).await;
        println!("== {} -> {}", label, response.status);
        match (&response.data, &response.error) {
            (Some(data), _) => println!("{}", serde_json::to_string_pretty(data)?),
            (None, Some(error)) => println!("error: {}", error),
            (None, None) => {}
        }
    }

    Ok(())
}
