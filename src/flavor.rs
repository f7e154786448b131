//! Flavor model: identifiers, stored flavors and creation input.
//!
//! A flavor is a named sizing template for compute instances. Only
//! `is_public` matters to access control; the sizing attributes are carried
//! through untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::error::{AccessError, AccessResult};

const MAX_FIELD_LEN: usize = 255;

/// A validated flavor identifier.
///
/// Identifiers are opaque strings. Numeric ids supplied as JSON numbers are
/// accepted and stored in their decimal form.
///
/// ## Validation Rules
///
/// - Must not be empty or only whitespace
/// - At most 255 characters
/// - Only ASCII letters, digits, `_`, `-`, `.` and spaces
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlavorId(String);

impl FlavorId {
    /// Create a new FlavorId with validation.
    pub fn new(value: impl Into<String>) -> AccessResult<Self> {
        let value = value.into();
        Self::validate_format(&value)?;
        Ok(Self(value))
    }

    /// Generate a random identifier for flavors created without one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_format(value: &str) -> AccessResult<()> {
        if value.trim().is_empty() {
            return Err(AccessError::invalid_spec("flavor id must not be empty"));
        }
        if value.len() > MAX_FIELD_LEN {
            return Err(AccessError::invalid_spec(format!(
                "flavor id must be at most {} characters",
                MAX_FIELD_LEN
            )));
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' ')))
        {
            return Err(AccessError::invalid_spec(format!(
                "flavor id contains invalid character '{}'",
                bad
            )));
        }
        Ok(())
    }
}

impl fmt::Display for FlavorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FlavorId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FlavorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) if n.is_u64() => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "flavor id must be a string or non-negative integer, got {}",
                    other
                )));
            }
        };
        FlavorId::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A stored flavor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: FlavorId,
    pub name: String,
    pub ram: u64,
    pub vcpus: u32,
    pub disk: u64,
    pub ephemeral: u64,
    pub swap: u64,
    pub rxtx_factor: f64,
    /// Rendered as `OS-FLV-DISABLED:disabled`. Flavors are always created
    /// enabled and no operation here toggles it.
    pub disabled: bool,
    pub is_public: bool,
}

/// Input to flavor creation, in the shape of the `flavor` request document.
///
/// ```rust
/// use flavor_access::flavor::FlavorSpec;
/// use serde_json::json;
///
/// let spec: FlavorSpec = serde_json::from_value(json!({
///     "name": "test_flavor",
///     "ram": 1024,
///     "vcpus": 2,
///     "disk": 10,
///     "id": "10"
/// })).unwrap();
/// let flavor = spec.into_flavor().unwrap();
/// assert!(flavor.is_public);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlavorSpec {
    pub name: String,
    #[serde(default)]
    pub id: Option<FlavorId>,
    pub ram: i64,
    pub vcpus: i64,
    pub disk: i64,
    #[serde(default, rename = "OS-FLV-EXT-DATA:ephemeral")]
    pub ephemeral: i64,
    #[serde(default, deserialize_with = "deserialize_swap")]
    pub swap: i64,
    #[serde(default = "default_rxtx_factor")]
    pub rxtx_factor: f64,
    #[serde(default = "default_is_public", rename = "os-flavor-access:is_public")]
    pub is_public: bool,
}

fn default_rxtx_factor() -> f64 {
    1.0
}

fn default_is_public() -> bool {
    true
}

// Swap is rendered as "" when zero, so accept that back on input.
fn deserialize_swap<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("swap must be an integer")),
        Value::String(s) if s.is_empty() => Ok(0),
        Value::String(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("swap must be an integer, got '{}'", s))),
        Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!(
            "swap must be an integer, got {}",
            other
        ))),
    }
}

impl FlavorSpec {
    /// Minimal spec with the given name and sizing; public by default.
    pub fn new(name: impl Into<String>, ram: i64, vcpus: i64, disk: i64) -> Self {
        Self {
            name: name.into(),
            id: None,
            ram,
            vcpus,
            disk,
            ephemeral: 0,
            swap: 0,
            rxtx_factor: default_rxtx_factor(),
            is_public: default_is_public(),
        }
    }

    pub fn with_id(mut self, id: FlavorId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Validate the spec and build the flavor it describes.
    pub fn into_flavor(self) -> AccessResult<Flavor> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AccessError::invalid_spec("name must not be empty"));
        }
        if name.chars().count() > MAX_FIELD_LEN {
            return Err(AccessError::invalid_spec(format!(
                "name must be at most {} characters",
                MAX_FIELD_LEN
            )));
        }

        let ram = positive("ram", self.ram)?;
        let vcpus = u32::try_from(positive("vcpus", self.vcpus)?)
            .map_err(|_| AccessError::invalid_spec("vcpus is too large"))?;
        let disk = non_negative("disk", self.disk)?;
        let ephemeral = non_negative("OS-FLV-EXT-DATA:ephemeral", self.ephemeral)?;
        let swap = non_negative("swap", self.swap)?;

        if !(self.rxtx_factor.is_finite() && self.rxtx_factor > 0.0) {
            return Err(AccessError::invalid_spec("rxtx_factor must be a positive number"));
        }

        Ok(Flavor {
            id: self.id.unwrap_or_else(FlavorId::generate),
            name,
            ram,
            vcpus,
            disk,
            ephemeral,
            swap,
            rxtx_factor: self.rxtx_factor,
            disabled: false,
            is_public: self.is_public,
        })
    }
}

fn positive(field: &str, value: i64) -> AccessResult<u64> {
    if value < 1 {
        return Err(AccessError::invalid_spec(format!(
            "{} must be at least 1, got {}",
            field, value
        )));
    }
    Ok(value as u64)
}

fn non_negative(field: &str, value: i64) -> AccessResult<u64> {
    u64::try_from(value).map_err(|_| {
        AccessError::invalid_spec(format!("{} must not be negative, got {}", field, value))
    })
}

/// Criteria for flavor listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlavorFilter {
    /// Restrict to public (`Some(true)`) or private (`Some(false)`) flavors
    pub is_public: Option<bool>,
    /// Restrict to flavors the tenant is allowed to use
    pub tenant: Option<String>,
}

impl FlavorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_is_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn for_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}
