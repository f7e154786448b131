//! Access-control registry for shared compute flavors.
//!
//! Decides which tenants may use a flavor: public flavors are usable by
//! everyone, private flavors only by tenants holding an explicit grant.
//! Grant mutations follow a protocol-version-gated policy (see [`policy`]),
//! and every operation returns a typed [`AccessError`] on failure.
//!
//! # Core Components
//!
//! - [`FlavorAccessRegistry`] - Flavor directory, grant mutation and eligibility
//! - [`FlavorStore`] - Trait for implementing storage backends
//! - [`FlavorOperationHandler`] - Transport-agnostic request/response layer
//!
//! # Quick Start
//!
//! ```rust
//! use flavor_access::{ApiVersion, FlavorAccessRegistry, FlavorId, FlavorSpec};
//! use flavor_access::storage::InMemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = FlavorAccessRegistry::new(InMemoryStorage::new())?;
//! let id = FlavorId::new("10")?;
//! registry
//!     .create_flavor(FlavorSpec::new("test_flavor", 1024, 2, 10).with_id(id.clone()).with_public(false))
//!     .await?;
//!
//! registry.add_tenant_access(&id, "fake_tenant", ApiVersion::V2_1).await?;
//! assert_eq!(registry.list_access(&id).await?.len(), 1);
//!
//! registry.remove_tenant_access(&id, "fake_tenant").await?;
//! assert!(registry.list_access(&id).await?.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod error;
pub mod flavor;
pub mod grant;
pub mod operation_handler;
pub mod policy;
pub mod registry;
pub mod storage;
pub mod version;

pub use capabilities::{Capability, CapabilitySet};
pub use error::{AccessError, AccessResult, ErrorKind};
pub use flavor::{Flavor, FlavorFilter, FlavorId, FlavorSpec};
pub use grant::AccessGrant;
pub use operation_handler::{
    FlavorAction, FlavorOperationHandler, FlavorOperationRequest, FlavorOperationResponse,
};
pub use policy::{Feature, VersionPolicy};
pub use registry::{FlavorAccessRegistry, RegistryBuilder, RegistryConfig};
pub use storage::{FlavorStore, InMemoryStorage, StorageError};
pub use version::{ApiVersion, VersionRange};
