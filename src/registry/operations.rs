//! Flavor directory, access mutation, listing and eligibility operations.

use log::{debug, info, trace, warn};
use std::collections::HashSet;

use crate::error::{AccessError, AccessResult};
use crate::flavor::{Flavor, FlavorFilter, FlavorId, FlavorSpec};
use crate::grant::AccessGrant;
use crate::policy::Feature;
use crate::registry::FlavorAccessRegistry;
use crate::storage::FlavorStore;
use crate::version::ApiVersion;

const MAX_TENANT_ID_LEN: usize = 255;

fn validate_tenant_id(tenant_id: &str) -> AccessResult<()> {
    if tenant_id.trim().is_empty() {
        return Err(AccessError::invalid_request("tenant id must not be empty"));
    }
    if tenant_id.len() > MAX_TENANT_ID_LEN {
        return Err(AccessError::invalid_request(format!(
            "tenant id must be at most {} characters",
            MAX_TENANT_ID_LEN
        )));
    }
    Ok(())
}

impl<S: FlavorStore> FlavorAccessRegistry<S> {
    /// Create a flavor from a validated spec.
    ///
    /// Both the id and the name must be unused.
    pub async fn create_flavor(&self, spec: FlavorSpec) -> AccessResult<Flavor> {
        let flavor = spec.into_flavor()?;
        let _guard = self.create_lock.lock().await;

        let existing = self
            .storage_call("list_flavors", self.storage.list_flavors())
            .await?;
        if existing.iter().any(|f| f.name == flavor.name) {
            return Err(AccessError::FlavorExists {
                field: "name",
                value: flavor.name,
            });
        }

        let inserted = self
            .storage_call("insert_flavor", self.storage.insert_flavor(flavor.clone()))
            .await?;
        if !inserted {
            return Err(AccessError::FlavorExists {
                field: "id",
                value: flavor.id.to_string(),
            });
        }

        info!(
            "created flavor {} ('{}', public: {})",
            flavor.id, flavor.name, flavor.is_public
        );
        Ok(flavor)
    }

    /// Resolve a flavor or fail with `FlavorNotFound`.
    pub async fn get_flavor(&self, flavor_id: &FlavorId) -> AccessResult<Flavor> {
        trace!("resolving flavor {}", flavor_id);
        self.storage_call("get_flavor", self.storage.get_flavor(flavor_id))
            .await?
            .ok_or_else(|| AccessError::flavor_not_found(flavor_id))
    }

    /// Full flavor detail, including `is_public`.
    pub async fn show_flavor(&self, flavor_id: &FlavorId) -> AccessResult<Flavor> {
        self.get_flavor(flavor_id).await
    }

    /// Delete a flavor together with all of its grants.
    pub async fn delete_flavor(&self, flavor_id: &FlavorId) -> AccessResult<()> {
        let guard = self.lock_flavor(flavor_id).await;
        let deleted = self
            .storage_call("delete_flavor", self.storage.delete_flavor(flavor_id))
            .await;
        drop(guard);
        self.release_flavor_lock(flavor_id).await;

        if !deleted? {
            return Err(AccessError::flavor_not_found(flavor_id));
        }
        info!("deleted flavor {}", flavor_id);
        Ok(())
    }

    /// Detail listing ordered by flavor id.
    ///
    /// Each flavor carries its own `is_public`; access lists are not expanded.
    /// With a tenant filter only flavors that tenant may use are returned.
    pub async fn list_flavors(&self, filter: &FlavorFilter) -> AccessResult<Vec<Flavor>> {
        let flavors = self
            .storage_call("list_flavors", self.storage.list_flavors())
            .await?;

        let granted: Option<HashSet<FlavorId>> = match &filter.tenant {
            Some(tenant) => Some(
                self.storage_call("list_granted_flavors", self.storage.list_granted_flavors(tenant))
                    .await?
                    .into_iter()
                    .collect(),
            ),
            None => None,
        };

        let result: Vec<Flavor> = flavors
            .into_iter()
            .filter(|f| filter.is_public.is_none_or(|wanted| f.is_public == wanted))
            .filter(|f| {
                granted
                    .as_ref()
                    .is_none_or(|ids| f.is_public || ids.contains(&f.id))
            })
            .collect();

        debug!("listed {} flavor(s) for {:?}", result.len(), filter);
        Ok(result)
    }

    /// Grants on a flavor in creation order.
    ///
    /// Public flavors always report an empty list: access is universal, and
    /// grants recorded on them under older protocol versions have no effect.
    pub async fn list_access(&self, flavor_id: &FlavorId) -> AccessResult<Vec<AccessGrant>> {
        let flavor = self.get_flavor(flavor_id).await?;
        if flavor.is_public {
            return Ok(Vec::new());
        }
        self.storage_call("list_grants", self.storage.list_grants(flavor_id))
            .await
    }

    /// Grant a tenant access to a flavor.
    ///
    /// Under versions where [`Feature::RejectGrantOnPublicFlavor`] is enabled,
    /// granting on a public flavor is a conflict. Older versions accept it.
    /// Re-adding an existing grant is always an error.
    pub async fn add_tenant_access(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
        version: ApiVersion,
    ) -> AccessResult<AccessGrant> {
        let (grant, _) = self.add_and_list(flavor_id, tenant_id, version).await?;
        Ok(grant)
    }

    /// Grant a tenant access and return the flavor's access list as it
    /// stands after the grant.
    ///
    /// The list is read before the write under the same per-flavor lock, so
    /// a failure to produce it leaves the grant set untouched.
    pub async fn add_tenant_access_and_list(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
        version: ApiVersion,
    ) -> AccessResult<Vec<AccessGrant>> {
        let (_, grants) = self.add_and_list(flavor_id, tenant_id, version).await?;
        Ok(grants)
    }

    async fn add_and_list(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
        version: ApiVersion,
    ) -> AccessResult<(AccessGrant, Vec<AccessGrant>)> {
        let guard = self.lock_flavor(flavor_id).await;
        let result = self.add_locked(flavor_id, tenant_id, version).await;
        drop(guard);

        if matches!(result, Err(AccessError::FlavorNotFound { .. })) {
            self.release_flavor_lock(flavor_id).await;
        }
        result
    }

    async fn add_locked(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
        version: ApiVersion,
    ) -> AccessResult<(AccessGrant, Vec<AccessGrant>)> {
        let flavor = self.get_flavor(flavor_id).await?;
        validate_tenant_id(tenant_id)?;

        if flavor.is_public {
            if self
                .config
                .policy
                .is_enabled(Feature::RejectGrantOnPublicFlavor, version)
            {
                warn!(
                    "rejected grant for tenant {} on public flavor {} at version {}",
                    tenant_id, flavor_id, version
                );
                return Err(AccessError::PublicFlavorConflict {
                    flavor_id: flavor_id.clone(),
                    version,
                });
            }
            debug!(
                "accepting grant on public flavor {} under legacy version {}",
                flavor_id, version
            );
        }

        let duplicate = || AccessError::GrantExists {
            flavor_id: flavor_id.clone(),
            tenant_id: tenant_id.to_string(),
        };

        // Public flavors always list empty; private ones are read up front
        let mut visible = if flavor.is_public {
            Vec::new()
        } else {
            let grants = self
                .storage_call("list_grants", self.storage.list_grants(flavor_id))
                .await?;
            if grants.iter().any(|g| g.is_for(tenant_id)) {
                return Err(duplicate());
            }
            grants
        };

        let grant = AccessGrant::new(flavor_id.clone(), tenant_id);
        let inserted = self
            .storage_call("insert_grant", self.storage.insert_grant(grant.clone()))
            .await?;
        if !inserted {
            return Err(duplicate());
        }

        info!("granted tenant {} access to flavor {}", tenant_id, flavor_id);
        if !flavor.is_public {
            visible.push(grant.clone());
        }
        Ok((grant, visible))
    }

    /// Revoke a tenant's access to a flavor.
    ///
    /// Not version-gated. Fails with `GrantNotFound` when there is nothing to
    /// remove.
    pub async fn remove_tenant_access(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
    ) -> AccessResult<()> {
        self.remove_and_list(flavor_id, tenant_id).await?;
        Ok(())
    }

    /// Revoke a tenant's access and return the flavor's remaining access list.
    pub async fn remove_tenant_access_and_list(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
    ) -> AccessResult<Vec<AccessGrant>> {
        self.remove_and_list(flavor_id, tenant_id).await
    }

    async fn remove_and_list(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
    ) -> AccessResult<Vec<AccessGrant>> {
        let guard = self.lock_flavor(flavor_id).await;
        let result = self.remove_locked(flavor_id, tenant_id).await;
        drop(guard);

        if matches!(result, Err(AccessError::FlavorNotFound { .. })) {
            self.release_flavor_lock(flavor_id).await;
        }
        result
    }

    async fn remove_locked(
        &self,
        flavor_id: &FlavorId,
        tenant_id: &str,
    ) -> AccessResult<Vec<AccessGrant>> {
        let flavor = self.get_flavor(flavor_id).await?;
        validate_tenant_id(tenant_id)?;

        let mut remaining = if flavor.is_public {
            Vec::new()
        } else {
            self.storage_call("list_grants", self.storage.list_grants(flavor_id))
                .await?
        };

        let removed = self
            .storage_call("delete_grant", self.storage.delete_grant(flavor_id, tenant_id))
            .await?;
        if !removed {
            return Err(AccessError::GrantNotFound {
                flavor_id: flavor_id.clone(),
                tenant_id: tenant_id.to_string(),
            });
        }

        info!("revoked tenant {} access to flavor {}", tenant_id, flavor_id);
        remaining.retain(|g| !g.is_for(tenant_id));
        Ok(remaining)
    }

    /// Whether a tenant may boot instances from a flavor.
    ///
    /// True for every tenant on a public flavor; on a private flavor only
    /// when a grant exists.
    pub async fn can_use_flavor(&self, flavor_id: &FlavorId, tenant_id: &str) -> AccessResult<bool> {
        let flavor = self.get_flavor(flavor_id).await?;
        if flavor.is_public {
            return Ok(true);
        }
        self.storage_call("grant_exists", self.storage.grant_exists(flavor_id, tenant_id))
            .await
    }
}
