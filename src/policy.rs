//! Version-ordered behaviour policy.
//!
//! Behaviour that changes with the protocol version is keyed by a [`Feature`]
//! and looked up in a [`VersionPolicy`] table instead of being compared
//! against literal versions at call sites. Adding a new threshold means adding
//! a `Feature` variant and a table row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::version::{ApiVersion, VersionRange};

/// A behaviour that switches on at a given protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Adding tenant access to a public flavor is rejected with a conflict.
    RejectGrantOnPublicFlavor,
}

impl Feature {
    /// All known features, in declaration order.
    pub const ALL: &'static [Feature] = &[Feature::RejectGrantOnPublicFlavor];

    /// Version at which the feature ships by default.
    pub fn default_threshold(&self) -> ApiVersion {
        match self {
            Feature::RejectGrantOnPublicFlavor => ApiVersion::V2_7,
        }
    }
}

/// Maps each [`Feature`] to the first version that enables it.
///
/// Features without a row are never enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPolicy {
    thresholds: BTreeMap<Feature, ApiVersion>,
}

impl VersionPolicy {
    /// An empty table; no feature is ever enabled.
    pub fn empty() -> Self {
        Self {
            thresholds: BTreeMap::new(),
        }
    }

    /// Set or replace the threshold for a feature.
    pub fn with_threshold(mut self, feature: Feature, since: ApiVersion) -> Self {
        self.thresholds.insert(feature, since);
        self
    }

    /// First version enabling `feature`, if any.
    pub fn threshold(&self, feature: Feature) -> Option<ApiVersion> {
        self.thresholds.get(&feature).copied()
    }

    /// Whether `feature` is active for a request negotiated at `version`.
    pub fn is_enabled(&self, feature: Feature, version: ApiVersion) -> bool {
        self.threshold(feature)
            .is_some_and(|since| version >= since)
    }

    /// Thresholds falling outside `range`, which would make a feature
    /// unreachable or always on.
    pub fn out_of_range(&self, range: &VersionRange) -> Vec<(Feature, ApiVersion)> {
        self.thresholds
            .iter()
            .filter(|(_, since)| !range.contains(**since))
            .map(|(feature, since)| (*feature, *since))
            .collect()
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Feature::ALL.iter().fold(Self::empty(), |policy, feature| {
            policy.with_threshold(*feature, feature.default_threshold())
        })
    }
}
