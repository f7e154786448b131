//! Capability composition for the flavor API surface.
//!
//! The set of enabled API capabilities is fixed when the registry is built.
//! Each [`Capability`] gates a group of operations or response attributes; the
//! operation handler consults the [`CapabilitySet`] instead of loading
//! extension modules by name at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AccessError, AccessResult};

/// A unit of API functionality that can be enabled at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Create and delete flavors
    FlavorManage,
    /// Tenant access list, add/remove tenant actions, `is_public` attribute
    FlavorAccess,
    /// `OS-FLV-DISABLED:disabled` attribute
    FlavorDisabled,
    /// `OS-FLV-EXT-DATA:ephemeral` attribute
    FlavorExtraData,
    /// `swap` attribute
    FlavorSwap,
}

impl Capability {
    pub const ALL: &'static [Capability] = &[
        Capability::FlavorManage,
        Capability::FlavorAccess,
        Capability::FlavorDisabled,
        Capability::FlavorExtraData,
        Capability::FlavorSwap,
    ];

    /// Public alias advertised to clients.
    pub fn alias(&self) -> &'static str {
        match self {
            Capability::FlavorManage => "os-flavor-manage",
            Capability::FlavorAccess => "os-flavor-access",
            Capability::FlavorDisabled => "OS-FLV-DISABLED",
            Capability::FlavorExtraData => "OS-FLV-EXT-DATA",
            Capability::FlavorSwap => "os-flavor-swap",
        }
    }

    /// Capabilities that must also be enabled for this one to work.
    pub fn requires(&self) -> &'static [Capability] {
        match self {
            Capability::FlavorAccess => &[Capability::FlavorManage],
            _ => &[],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// The capabilities enabled for one registry instance.
///
/// ```rust
/// use flavor_access::capabilities::{Capability, CapabilitySet};
///
/// let caps = CapabilitySet::standard().without(Capability::FlavorSwap);
/// assert!(caps.contains(Capability::FlavorAccess));
/// assert!(!caps.contains(Capability::FlavorSwap));
/// assert!(caps.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    enabled: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// No capabilities enabled.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every capability enabled.
    pub fn standard() -> Self {
        Self {
            enabled: Capability::ALL.iter().copied().collect(),
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.enabled.insert(capability);
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.enabled.remove(&capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
    }

    /// Fail with `InvalidRequest` if the capability is not enabled.
    pub fn require(&self, capability: Capability) -> AccessResult<()> {
        if self.contains(capability) {
            Ok(())
        } else {
            Err(AccessError::invalid_request(format!(
                "capability '{}' is not enabled",
                capability
            )))
        }
    }

    /// Check that every enabled capability has its dependencies enabled.
    pub fn validate(&self) -> AccessResult<()> {
        for capability in &self.enabled {
            if let Some(missing) = capability
                .requires()
                .iter()
                .find(|dep| !self.enabled.contains(*dep))
            {
                return Err(AccessError::invalid_request(format!(
                    "capability '{}' requires '{}'",
                    capability, missing
                )));
            }
        }
        Ok(())
    }

    /// Aliases of the enabled capabilities, in a stable order.
    pub fn aliases(&self) -> Vec<&'static str> {
        self.enabled.iter().map(Capability::alias).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.enabled.iter().copied()
    }
}
