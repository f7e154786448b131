//! Protocol microversions.
//!
//! An [`ApiVersion`] is a `major.minor` pair negotiated per request. Versions
//! are totally ordered, so behaviour changes can be expressed as "enabled at
//! or after version X" (see [`crate::policy`]).
//!
//! ```rust
//! use flavor_access::version::ApiVersion;
//!
//! let v: ApiVersion = "2.7".parse().unwrap();
//! assert!(v > ApiVersion::new(2, 1));
//! assert!(ApiVersion::new(2, 10) > v);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::AccessError;

/// Keyword a client may send to request the newest supported version.
pub const LATEST: &str = "latest";

/// An ordered `major.minor` protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: u16,
    minor: u16,
}

impl ApiVersion {
    /// Oldest version the API has ever served.
    pub const V2_1: ApiVersion = ApiVersion::new(2, 1);

    /// Version at which public flavors stop accepting explicit grants.
    pub const V2_7: ApiVersion = ApiVersion::new(2, 7);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error returned when a version string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version string '{0}', expected '<major>.<minor>'")]
pub struct ParseVersionError(String);

impl FromStr for ApiVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (major, minor) = trimmed
            .split_once('.')
            .ok_or_else(|| ParseVersionError(s.to_string()))?;

        // "2.07" style zero padding is not a valid microversion
        let parse_part = |part: &str| -> Result<u16, ParseVersionError> {
            if part.is_empty() || (part.len() > 1 && part.starts_with('0')) {
                return Err(ParseVersionError(s.to_string()));
            }
            part.parse::<u16>()
                .map_err(|_| ParseVersionError(s.to_string()))
        };

        Ok(ApiVersion::new(parse_part(major)?, parse_part(minor)?))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of versions a deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: ApiVersion,
    pub max: ApiVersion,
}

impl VersionRange {
    pub fn new(min: ApiVersion, max: ApiVersion) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, version: ApiVersion) -> bool {
        self.min <= version && version <= self.max
    }

    /// Resolve the version a client asked for.
    ///
    /// A missing header selects the minimum, `latest` selects the maximum,
    /// anything else must parse and fall inside the range.
    pub fn negotiate(&self, requested: Option<&str>) -> Result<ApiVersion, AccessError> {
        let requested = match requested.map(str::trim) {
            None | Some("") => return Ok(self.min),
            Some(value) if value.eq_ignore_ascii_case(LATEST) => return Ok(self.max),
            Some(value) => value,
        };

        let version: ApiVersion = requested
            .parse()
            .map_err(|e: ParseVersionError| AccessError::invalid_request(e.to_string()))?;

        if self.contains(version) {
            Ok(version)
        } else {
            Err(AccessError::UnsupportedVersion {
                requested: requested.to_string(),
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::new(ApiVersion::V2_1, ApiVersion::V2_7)
    }
}
