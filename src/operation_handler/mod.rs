//! Transport-agnostic operation handler for the flavor API.
//!
//! Turns structured requests into registry calls and renders the results as
//! the JSON documents and HTTP-equivalent status codes an HTTP layer would
//! send back. Routing, authentication and wire framing stay outside.
//!
//! # Key Types
//!
//! - [`FlavorOperationHandler`] - Dispatches requests to the registry
//! - [`FlavorOperationRequest`] - Operation, target flavor, body and microversion
//! - [`FlavorOperationResponse`] - Status, body and metadata
//!
//! # Examples
//!
//! ```rust
//! use flavor_access::operation_handler::{FlavorOperationHandler, FlavorOperationRequest};
//! use flavor_access::registry::FlavorAccessRegistry;
//! use flavor_access::storage::InMemoryStorage;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = FlavorAccessRegistry::new(InMemoryStorage::new())?;
//! let handler = FlavorOperationHandler::new(registry);
//!
//! let create = FlavorOperationRequest::create_flavor(json!({
//!     "flavor": {"name": "test_flavor", "ram": 1024, "vcpus": 2, "disk": 10, "id": "10"}
//! }));
//! assert_eq!(handler.handle_operation(create).await.status, 200);
//!
//! let add = FlavorOperationRequest::action("10", json!({"addTenantAccess": {"tenant": "fake_tenant"}}))
//!     .with_version("2.7");
//! assert_eq!(handler.handle_operation(add).await.status, 409);
//! # Ok(())
//! # }
//! ```

mod builders;
mod core;
mod errors;
mod handlers;
pub mod views;

pub use core::{
    FlavorAction, FlavorOperationHandler, FlavorOperationRequest, FlavorOperationResponse,
    FlavorOperationType, OperationMetadata,
};
pub use errors::{create_error_response, create_unsupported_response};
