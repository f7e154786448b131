//! Core registry structure, per-flavor locking and storage call plumbing.

use log::warn;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::capabilities::CapabilitySet;
use crate::error::{AccessError, AccessResult};
use crate::flavor::FlavorId;
use crate::registry::config::{RegistryBuilder, RegistryConfig};
use crate::storage::{FlavorStore, StorageError};

/// Access-control registry for flavors.
///
/// The registry owns a [`FlavorStore`] and applies visibility rules, the
/// grant mutation protocol and version-gated policy on top of it. Mutations of
/// one flavor's grant set are serialized through a per-flavor lock, so the
/// resolve, check and write steps of an add or remove never interleave with
/// another mutation (or deletion) of the same flavor. Reads never take the
/// per-flavor lock.
///
/// # Examples
///
/// ```rust
/// use flavor_access::registry::FlavorAccessRegistry;
/// use flavor_access::storage::InMemoryStorage;
/// use flavor_access::flavor::{FlavorId, FlavorSpec};
/// use flavor_access::version::ApiVersion;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = FlavorAccessRegistry::new(InMemoryStorage::new())?;
/// let id = FlavorId::new("10")?;
/// registry
///     .create_flavor(FlavorSpec::new("test_flavor", 1024, 2, 10).with_id(id.clone()).with_public(false))
///     .await?;
///
/// assert!(!registry.can_use_flavor(&id, "fake_tenant").await?);
/// registry.add_tenant_access(&id, "fake_tenant", ApiVersion::V2_1).await?;
/// assert!(registry.can_use_flavor(&id, "fake_tenant").await?);
/// # Ok(())
/// # }
/// ```
pub struct FlavorAccessRegistry<S> {
    pub(super) storage: S,
    pub(super) config: RegistryConfig,
    pub(super) capabilities: CapabilitySet,
    // flavor_id -> lock serializing grant mutations on that flavor
    pub(super) locks: Mutex<HashMap<FlavorId, Arc<Mutex<()>>>>,
    // serializes the uniqueness check and insert of flavor creation
    pub(super) create_lock: Mutex<()>,
}

impl<S: FlavorStore> FlavorAccessRegistry<S> {
    /// Create a registry with default configuration and every capability.
    pub fn new(storage: S) -> AccessResult<Self> {
        RegistryBuilder::new(storage).build()
    }

    /// Create a registry with the given configuration and every capability.
    pub fn with_config(storage: S, config: RegistryConfig) -> AccessResult<Self> {
        RegistryBuilder::new(storage).with_config(config).build()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Direct access to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Acquire the mutation lock for one flavor.
    pub(super) async fn lock_flavor(&self, flavor_id: &FlavorId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.locks.lock().await;
            Arc::clone(table.entry(flavor_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the lock table entry for a flavor once nobody holds or awaits it.
    ///
    /// Must be called after the caller's own guard has been dropped.
    pub(super) async fn release_flavor_lock(&self, flavor_id: &FlavorId) {
        let mut table = self.locks.lock().await;
        if table
            .get(flavor_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(flavor_id);
        }
    }

    /// Number of flavors with a live lock entry.
    pub async fn active_lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Run one storage call, bounded by the configured timeout.
    ///
    /// Every storage failure, including the timeout, becomes
    /// [`AccessError::Unavailable`].
    pub(super) async fn storage_call<T, E, F>(
        &self,
        operation: &'static str,
        call: F,
    ) -> AccessResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<StorageError>,
    {
        let outcome = match self.config.storage_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| StorageError::Timeout {
                    operation: operation.to_string(),
                    duration: limit,
                })
                .and_then(|result| result.map_err(Into::into)),
            None => call.await.map_err(Into::into),
        };

        outcome.map_err(|e| {
            warn!("storage operation '{}' failed: {}", operation, e);
            AccessError::Unavailable(e)
        })
    }
}
