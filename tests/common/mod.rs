//! Shared fixtures for flavor access integration tests.
//!
//! Mirrors the documents used by the flavor API samples: the stock flavors a
//! fresh deployment ships with, and the create / add / remove request bodies.

#![allow(dead_code)]

use flavor_access::operation_handler::{FlavorOperationHandler, FlavorOperationRequest};
use flavor_access::registry::FlavorAccessRegistry;
use flavor_access::storage::InMemoryStorage;
use flavor_access::{FlavorId, FlavorSpec};
use serde_json::{Value, json};

pub const FLAVOR_ID: &str = "10";
pub const FLAVOR_NAME: &str = "test_flavor";
pub const TENANT_ID: &str = "fake_tenant";

/// Stock flavors: (id, name, ram, vcpus, disk).
pub const DEFAULT_FLAVORS: &[(&str, &str, i64, i64, i64)] = &[
    ("1", "m1.tiny", 512, 1, 1),
    ("2", "m1.small", 2048, 1, 20),
    ("3", "m1.medium", 4096, 2, 40),
    ("4", "m1.large", 8192, 4, 80),
    ("5", "m1.xlarge", 16384, 8, 160),
];

/// Initialize logging once; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn flavor_id(value: &str) -> FlavorId {
    FlavorId::new(value).expect("valid flavor id")
}

pub fn new_registry() -> FlavorAccessRegistry<InMemoryStorage> {
    init_logging();
    FlavorAccessRegistry::new(InMemoryStorage::new()).expect("default registry")
}

/// Registry pre-populated with the stock public flavors.
pub async fn seeded_registry() -> FlavorAccessRegistry<InMemoryStorage> {
    let registry = new_registry();
    for (id, name, ram, vcpus, disk) in DEFAULT_FLAVORS {
        registry
            .create_flavor(FlavorSpec::new(*name, *ram, *vcpus, *disk).with_id(flavor_id(id)))
            .await
            .expect("seed flavor");
    }
    registry
}

pub async fn seeded_handler() -> FlavorOperationHandler<InMemoryStorage> {
    FlavorOperationHandler::new(seeded_registry().await)
}

/// `POST /flavors` body.
pub fn create_flavor_document(flavor_id: &str, name: &str, is_public: bool) -> Value {
    json!({
        "flavor": {
            "name": name,
            "ram": 1024,
            "vcpus": 2,
            "disk": 10,
            "id": flavor_id,
            "os-flavor-access:is_public": is_public
        }
    })
}

pub fn add_tenant_document(tenant: &str) -> Value {
    json!({ "addTenantAccess": { "tenant": tenant } })
}

pub fn remove_tenant_document(tenant: &str) -> Value {
    json!({ "removeTenantAccess": { "tenant": tenant } })
}

/// Create the private sample flavor through the handler.
pub async fn create_sample_flavor(handler: &FlavorOperationHandler<InMemoryStorage>) {
    let response = handler
        .handle_operation(FlavorOperationRequest::create_flavor(create_flavor_document(
            FLAVOR_ID,
            FLAVOR_NAME,
            false,
        )))
        .await;
    assert_eq!(response.status, 200, "create failed: {:?}", response.error);
}

/// Grant the sample tenant access to the sample flavor through the handler.
pub async fn add_sample_tenant(handler: &FlavorOperationHandler<InMemoryStorage>) {
    let response = handler
        .handle_operation(FlavorOperationRequest::action(
            FLAVOR_ID,
            add_tenant_document(TENANT_ID),
        ))
        .await;
    assert_eq!(response.status, 200, "add failed: {:?}", response.error);
    assert_eq!(
        response.data,
        Some(json!({
            "flavor_access": [{"flavor_id": FLAVOR_ID, "tenant_id": TENANT_ID}]
        }))
    );
}
