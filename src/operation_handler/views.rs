//! JSON views of flavors and access lists.
//!
//! Extension attributes are only rendered when their capability is enabled,
//! so the documents match what clients of a given deployment expect.

use serde_json::{Map, Value, json};

use crate::capabilities::{Capability, CapabilitySet};
use crate::flavor::Flavor;
use crate::grant::AccessGrant;

/// Render one flavor.
///
/// ```rust
/// use flavor_access::capabilities::CapabilitySet;
/// use flavor_access::flavor::{FlavorId, FlavorSpec};
/// use flavor_access::operation_handler::views::flavor_view;
///
/// let flavor = FlavorSpec::new("test_flavor", 1024, 2, 10)
///     .with_id(FlavorId::new("10").unwrap())
///     .into_flavor()
///     .unwrap();
/// let view = flavor_view(&flavor, &CapabilitySet::standard());
/// assert_eq!(view["os-flavor-access:is_public"], true);
/// assert_eq!(view["swap"], "");
/// ```
pub fn flavor_view(flavor: &Flavor, capabilities: &CapabilitySet) -> Value {
    let mut view = Map::new();
    view.insert("id".to_string(), json!(flavor.id));
    view.insert("name".to_string(), json!(flavor.name));
    view.insert("ram".to_string(), json!(flavor.ram));
    view.insert("vcpus".to_string(), json!(flavor.vcpus));
    view.insert("disk".to_string(), json!(flavor.disk));
    view.insert("rxtx_factor".to_string(), json!(flavor.rxtx_factor));

    for capability in capabilities.iter() {
        match capability {
            Capability::FlavorAccess => {
                view.insert("os-flavor-access:is_public".to_string(), json!(flavor.is_public));
            }
            Capability::FlavorDisabled => {
                view.insert("OS-FLV-DISABLED:disabled".to_string(), json!(flavor.disabled));
            }
            Capability::FlavorExtraData => {
                view.insert("OS-FLV-EXT-DATA:ephemeral".to_string(), json!(flavor.ephemeral));
            }
            Capability::FlavorSwap => {
                // zero swap is rendered as an empty string
                let swap = if flavor.swap == 0 {
                    json!("")
                } else {
                    json!(flavor.swap)
                };
                view.insert("swap".to_string(), swap);
            }
            Capability::FlavorManage => {}
        }
    }

    Value::Object(view)
}

/// `{"flavor": {...}}`
pub fn flavor_document(flavor: &Flavor, capabilities: &CapabilitySet) -> Value {
    json!({ "flavor": flavor_view(flavor, capabilities) })
}

/// `{"flavors": [...]}`
pub fn flavors_document(flavors: &[Flavor], capabilities: &CapabilitySet) -> Value {
    let views: Vec<Value> = flavors
        .iter()
        .map(|flavor| flavor_view(flavor, capabilities))
        .collect();
    json!({ "flavors": views })
}

/// `{"flavor_access": [{"flavor_id": ..., "tenant_id": ...}]}`
pub fn access_document(grants: &[AccessGrant]) -> Value {
    json!({ "flavor_access": grants })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::{FlavorId, FlavorSpec};

    fn flavor() -> Flavor {
        FlavorSpec {
            swap: 512,
            ..FlavorSpec::new("test_flavor", 1024, 2, 10)
                .with_id(FlavorId::new("10").unwrap())
                .with_public(false)
        }
        .into_flavor()
        .unwrap()
    }

    #[test]
    fn test_view_with_all_capabilities() {
        let view = flavor_view(&flavor(), &CapabilitySet::standard());
        assert_eq!(
            view,
            json!({
                "id": "10",
                "name": "test_flavor",
                "ram": 1024,
                "vcpus": 2,
                "disk": 10,
                "rxtx_factor": 1.0,
                "os-flavor-access:is_public": false,
                "OS-FLV-DISABLED:disabled": false,
                "OS-FLV-EXT-DATA:ephemeral": 0,
                "swap": 512
            })
        );
    }

    #[test]
    fn test_view_omits_disabled_capabilities() {
        let caps = CapabilitySet::empty().with(Capability::FlavorManage);
        let view = flavor_view(&flavor(), &caps);
        let object = view.as_object().unwrap();
        assert!(!object.contains_key("os-flavor-access:is_public"));
        assert!(!object.contains_key("swap"));
        assert!(!object.contains_key("OS-FLV-DISABLED:disabled"));
        assert_eq!(object.len(), 6);
    }

    #[test]
    fn test_access_document() {
        let grants = vec![AccessGrant::new(FlavorId::new("10").unwrap(), "fake_tenant")];
        assert_eq!(
            access_document(&grants),
            json!({"flavor_access": [{"flavor_id": "10", "tenant_id": "fake_tenant"}]})
        );
        assert_eq!(access_document(&[]), json!({"flavor_access": []}));
    }
}
