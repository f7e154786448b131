//! Access grants: permission for one tenant to use one private flavor.

use serde::{Deserialize, Serialize};

use crate::flavor::FlavorId;

/// A single (flavor, tenant) access grant.
///
/// Serializes to the `flavor_access` list entry shape:
/// `{"flavor_id": "10", "tenant_id": "fake_tenant"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessGrant {
    pub flavor_id: FlavorId,
    pub tenant_id: String,
}

impl AccessGrant {
    pub fn new(flavor_id: FlavorId, tenant_id: impl Into<String>) -> Self {
        Self {
            flavor_id,
            tenant_id: tenant_id.into(),
        }
    }

    /// Whether this grant is for the given tenant.
    pub fn is_for(&self, tenant_id: &str) -> bool {
        self.tenant_id == tenant_id
    }
}
