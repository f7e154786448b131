//! Storage abstraction for flavors and their access grants.
//!
//! The [`FlavorStore`] trait is pure persistence: put, get, delete and list.
//! It knows nothing about visibility rules, protocol versions or duplicate
//! detection beyond what is needed to keep a single write atomic. All access
//! control lives in [`crate::registry`].
//!
//! # Example Usage
//!
//! ```rust
//! use flavor_access::flavor::{FlavorId, FlavorSpec};
//! use flavor_access::grant::AccessGrant;
//! use flavor_access::storage::{FlavorStore, InMemoryStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//! let id = FlavorId::new("10")?;
//! let flavor = FlavorSpec::new("test_flavor", 1024, 2, 10)
//!     .with_id(id.clone())
//!     .with_public(false)
//!     .into_flavor()?;
//!
//! assert!(storage.insert_flavor(flavor).await?);
//! storage.insert_grant(AccessGrant::new(id.clone(), "fake_tenant")).await?;
//! assert_eq!(storage.list_grants(&id).await?.len(), 1);
//!
//! // Deleting the flavor takes its grants with it
//! assert!(storage.delete_flavor(&id).await?);
//! assert!(storage.list_grants(&id).await?.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::{InMemoryStorage, InMemoryStorageStats};

use std::future::Future;

use crate::flavor::{Flavor, FlavorId};
use crate::grant::AccessGrant;

/// Persistence operations for flavors and grants.
///
/// # Design Principles
///
/// - **Single-call atomicity**: each method applies fully or not at all
/// - **Absence is not an error**: lookups return `Option`/`bool`
/// - **Insertion order**: grants for a flavor come back in the order they were
///   inserted
/// - **Cascade on delete**: removing a flavor removes its grants in the same call
pub trait FlavorStore: Send + Sync {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Into<StorageError> + Send + Sync + 'static;

    /// Insert a flavor. Returns `false` without writing if the id is taken.
    fn insert_flavor(
        &self,
        flavor: Flavor,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Fetch a flavor by id.
    fn get_flavor(
        &self,
        id: &FlavorId,
    ) -> impl Future<Output = Result<Option<Flavor>, Self::Error>> + Send;

    /// Delete a flavor and every grant on it.
    ///
    /// Returns `true` if the flavor existed.
    fn delete_flavor(
        &self,
        id: &FlavorId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// All flavors, ordered by id.
    fn list_flavors(&self) -> impl Future<Output = Result<Vec<Flavor>, Self::Error>> + Send;

    /// Grants on one flavor in insertion order. Empty for unknown flavors.
    fn list_grants(
        &self,
        flavor_id: &FlavorId,
    ) -> impl Future<Output = Result<Vec<AccessGrant>, Self::Error>> + Send;

    /// Ids of every flavor on which the tenant holds a grant.
    fn list_granted_flavors(
        &self,
        tenant_id: &str,
    ) -> impl Future<Output = Result<Vec<FlavorId>, Self::Error>> + Send;

    /// Check whether a specific grant exists.
    fn grant_exists(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Append a grant. Returns `false` without writing if it already exists.
    fn insert_grant(
        &self,
        grant: AccessGrant,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Remove a grant. Returns `true` if it existed.
    fn delete_grant(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
