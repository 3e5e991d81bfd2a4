//! Decoding descriptors from stored documents.

use crate::descriptor::{AccessDescriptor, AccessMode};
use crate::role::RoleTier;
use mend_core::{Fields, Value};

/// Where a resource family keeps its sharing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorLayout {
    /// Field holding a single owner id, if the family has one.
    pub owner_field: Option<&'static str>,
    /// Map field holding the general access settings.
    pub settings_field: &'static str,
    pub mode_field: &'static str,
    pub public_role_field: &'static str,
}

impl DescriptorLayout {
    /// Designs: an `owner` string plus per-tier lists under `designSettings`.
    pub fn design() -> Self {
        Self {
            owner_field: Some("owner"),
            settings_field: "designSettings",
            mode_field: "generalAccessSetting",
            public_role_field: "generalAccessRole",
        }
    }

    /// Projects: managers are a list like every other tier.
    pub fn project() -> Self {
        Self {
            owner_field: None,
            settings_field: "projectSettings",
            mode_field: "generalAccessSetting",
            public_role_field: "generalAccessRole",
        }
    }
}

impl<R: RoleTier> AccessDescriptor<R> {
    /// Decode the sharing configuration stored in `doc`.
    ///
    /// Missing or mistyped fields read as empty lists and restricted access.
    pub fn from_document(doc: &Fields, layout: &DescriptorLayout) -> Self {
        let mut descriptor = Self {
            owner_id: layout
                .owner_field
                .and_then(|field| doc.get(field))
                .and_then(Value::as_str)
                .map(str::to_string),
            ..Self::default()
        };

        for tier in R::ALL {
            let members = doc
                .get(tier.list_field())
                .and_then(Value::as_list)
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str);
            for actor in members {
                descriptor = descriptor.with_member(*tier, actor);
            }
        }

        let settings = doc.get(layout.settings_field).and_then(Value::as_map);
        let setting = |field: &str| {
            settings
                .and_then(|map| map.get(field))
                .and_then(Value::as_int)
        };
        descriptor.mode = setting(layout.mode_field)
            .map(AccessMode::from_code)
            .unwrap_or_default();
        if descriptor.mode == AccessMode::Public {
            descriptor.public_role = setting(layout.public_role_field).and_then(R::from_code);
        }

        descriptor
    }
}
