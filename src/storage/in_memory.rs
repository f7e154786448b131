//! In-memory storage for flavors and grants.
//!
//! Thread-safe implementation of [`FlavorStore`] backed by `HashMap`s behind
//! a tokio `RwLock`. Each call takes the lock once, so readers never observe a
//! half-applied write such as a flavor deleted but its grants still present.
//!
//! # Performance Characteristics
//!
//! * flavor get/insert/delete: O(1) average, plus O(g) grant cascade on delete
//! * grant insert/exists/delete: O(g) where g is grants on that flavor
//! * flavor listing: O(n log n) for the id sort
//! * granted-flavor lookup: O(total grants)

use log::trace;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::flavor::{Flavor, FlavorId};
use crate::grant::AccessGrant;
use crate::storage::{FlavorStore, StorageError};

#[derive(Debug, Default)]
struct Tables {
    flavors: HashMap<FlavorId, Flavor>,
    // flavor_id -> tenant ids in insertion order
    grants: HashMap<FlavorId, Vec<String>>,
}

/// Thread-safe in-memory storage implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get storage statistics for debugging and monitoring.
    pub async fn stats(&self) -> InMemoryStorageStats {
        let tables = self.tables.read().await;
        let public_flavors = tables.flavors.values().filter(|f| f.is_public).count();

        InMemoryStorageStats {
            flavor_count: tables.flavors.len(),
            public_flavor_count: public_flavors,
            grant_count: tables.grants.values().map(Vec::len).sum(),
        }
    }

    /// Clear all data (useful for testing).
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.flavors.clear();
        tables.grants.clear();
    }
}

impl FlavorStore for InMemoryStorage {
    type Error = StorageError;

    async fn insert_flavor(&self, flavor: Flavor) -> Result<bool, Self::Error> {
        let mut tables = self.tables.write().await;
        if tables.flavors.contains_key(&flavor.id) {
            return Ok(false);
        }
        trace!("storing flavor {}", flavor.id);
        tables.flavors.insert(flavor.id.clone(), flavor);
        Ok(true)
    }

    async fn get_flavor(&self, id: &FlavorId) -> Result<Option<Flavor>, Self::Error> {
        let tables = self.tables.read().await;
        Ok(tables.flavors.get(id).cloned())
    }

    async fn delete_flavor(&self, id: &FlavorId) -> Result<bool, Self::Error> {
        let mut tables = self.tables.write().await;
        let existed = tables.flavors.remove(id).is_some();
        if let Some(grants) = tables.grants.remove(id) {
            trace!("cascaded {} grant(s) for flavor {}", grants.len(), id);
        }
        Ok(existed)
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, Self::Error> {
        let tables = self.tables.read().await;
        let mut flavors: Vec<Flavor> = tables.flavors.values().cloned().collect();
        flavors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(flavors)
    }

    async fn list_grants(&self, flavor_id: &FlavorId) -> Result<Vec<AccessGrant>, Self::Error> {
        let tables = self.tables.read().await;
        let grants = tables
            .grants
            .get(flavor_id)
            .map(|tenants| {
                tenants
                    .iter()
                    .map(|tenant| AccessGrant::new(flavor_id.clone(), tenant.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(grants)
    }

    async fn list_granted_flavors(&self, tenant_id: &str) -> Result<Vec<FlavorId>, Self::Error> {
        let tables = self.tables.read().await;
        let mut ids: Vec<FlavorId> = tables
            .grants
            .iter()
            .filter(|(_, tenants)| tenants.iter().any(|t| t == tenant_id))
            .map(|(flavor_id, _)| flavor_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn grant_exists(&self, flavor_id: &FlavorId, tenant_id: &str) -> Result<bool, Self::Error> {
        let tables = self.tables.read().await;
        Ok(tables
            .grants
            .get(flavor_id)
            .is_some_and(|tenants| tenants.iter().any(|t| t == tenant_id)))
    }

    async fn insert_grant(&self, grant: AccessGrant) -> Result<bool, Self::Error> {
        let mut tables = self.tables.write().await;
        let tenants = tables.grants.entry(grant.flavor_id).or_default();
        if tenants.contains(&grant.tenant_id) {
            return Ok(false);
        }
        tenants.push(grant.tenant_id);
        Ok(true)
    }

    async fn delete_grant(&self, flavor_id: &FlavorId, tenant_id: &str) -> Result<bool, Self::Error> {
        let mut tables = self.tables.write().await;
        let Some(tenants) = tables.grants.get_mut(flavor_id) else {
            return Ok(false);
        };
        let Some(position) = tenants.iter().position(|t| t == tenant_id) else {
            return Ok(false);
        };
        // `remove` rather than `swap_remove` keeps the remaining order
        tenants.remove(position);
        if tenants.is_empty() {
            tables.grants.remove(flavor_id);
        }
        Ok(true)
    }
}

/// Statistics about the current state of in-memory storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStorageStats {
    /// Number of stored flavors
    pub flavor_count: usize,
    /// Number of those flavors that are public
    pub public_flavor_count: usize,
    /// Total number of access grants
    pub grant_count: usize,
}
