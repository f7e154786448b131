//! Registry configuration and builder.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::capabilities::CapabilitySet;
use crate::error::{AccessError, AccessResult};
use crate::policy::VersionPolicy;
use crate::registry::FlavorAccessRegistry;
use crate::storage::FlavorStore;
use crate::version::VersionRange;

/// Default bound on a single storage call.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a [`FlavorAccessRegistry`].
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use flavor_access::registry::RegistryConfig;
///
/// let config: RegistryConfig = serde_json::from_str(
///     r#"{"versions": {"min": "2.1", "max": "2.5"}}"#,
/// ).unwrap();
/// assert_eq!(config.versions.max.to_string(), "2.5");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Protocol versions accepted during negotiation.
    pub versions: VersionRange,

    /// Version thresholds for behaviour changes.
    pub policy: VersionPolicy,

    /// Upper bound on each storage call; `None` waits indefinitely.
    pub storage_timeout: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            versions: VersionRange::default(),
            policy: VersionPolicy::default(),
            storage_timeout: Some(DEFAULT_STORAGE_TIMEOUT),
        }
    }
}

impl RegistryConfig {
    pub fn with_versions(mut self, versions: VersionRange) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_policy(mut self, policy: VersionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_storage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.storage_timeout = timeout;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AccessResult<()> {
        if self.versions.min > self.versions.max {
            return Err(AccessError::invalid_request(format!(
                "minimum version {} is above maximum version {}",
                self.versions.min, self.versions.max
            )));
        }

        if let Some((feature, since)) = self.policy.out_of_range(&self.versions).first() {
            return Err(AccessError::invalid_request(format!(
                "policy threshold {} for {:?} is outside supported versions {} - {}",
                since, feature, self.versions.min, self.versions.max
            )));
        }

        if self.storage_timeout == Some(Duration::ZERO) {
            return Err(AccessError::invalid_request(
                "storage timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Builder for configuring and creating registry instances.
///
/// ```rust
/// use flavor_access::capabilities::{Capability, CapabilitySet};
/// use flavor_access::registry::RegistryBuilder;
/// use flavor_access::storage::InMemoryStorage;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = RegistryBuilder::new(InMemoryStorage::new())
///     .with_capabilities(CapabilitySet::standard().without(Capability::FlavorSwap))
///     .with_storage_timeout(Some(Duration::from_secs(1)))
///     .build()?;
/// assert!(!registry.capabilities().contains(Capability::FlavorSwap));
/// # Ok(())
/// # }
/// ```
pub struct RegistryBuilder<S> {
    storage: S,
    config: RegistryConfig,
    capabilities: CapabilitySet,
}

impl<S: FlavorStore> RegistryBuilder<S> {
    /// Start from default configuration with every capability enabled.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: RegistryConfig::default(),
            capabilities: CapabilitySet::standard(),
        }
    }

    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_versions(mut self, versions: VersionRange) -> Self {
        self.config.versions = versions;
        self
    }

    pub fn with_policy(mut self, policy: VersionPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn with_storage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.storage_timeout = timeout;
        self
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Validate configuration and capabilities and create the registry.
    pub fn build(self) -> AccessResult<FlavorAccessRegistry<S>> {
        self.config.validate()?;
        self.capabilities.validate()?;

        log::info!(
            "flavor access registry ready (versions {} - {}, capabilities: {})",
            self.config.versions.min,
            self.config.versions.max,
            self.capabilities.aliases().join(", ")
        );

        Ok(FlavorAccessRegistry {
            storage: self.storage,
            config: self.config,
            capabilities: self.capabilities,
            locks: Mutex::default(),
            create_lock: Mutex::new(()),
        })
    }
}
