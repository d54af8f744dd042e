//! Configuration for the group permission policy plugin.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Plugin configuration.
///
/// Permission lists hold patterns: an exact permission name, or a name with
/// `*` wildcards (`*.read`, `announcement.entity.*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PermissionPolicyConfig {
    /// Entity references whose holders are treated as guests.
    pub guest_group: Vec<String>,

    /// Group name to the entity references denoting membership.
    pub special_groups: BTreeMap<String, Vec<String>>,

    /// Group name to the permission patterns granted to its members.
    pub group_permissions: BTreeMap<String, Vec<String>>,

    /// Granted to every authenticated requester.
    pub authenticated_base_permissions: Vec<String>,

    /// Read permissions available without signing in.
    pub unauthenticated_permissions: Vec<String>,

    /// Read permissions available to guests.
    pub guest_permissions: Vec<String>,

    /// Creation permissions allowed for every authenticated requester.
    pub creation_permissions: Vec<String>,

    /// Permission name prefixes allowed for every authenticated requester.
    pub always_allow_prefixes: Vec<String>,
}

impl Default for PermissionPolicyConfig {
    fn default() -> Self {
        Self {
            guest_group: strings(&["user:default/guest", "group:default/guests"]),
            special_groups: BTreeMap::from([(
                "conselho".to_owned(),
                strings(&["group:default/conselho"]),
            )]),
            group_permissions: BTreeMap::from([(
                "conselho".to_owned(),
                strings(&["announcement.entity.*"]),
            )]),
            authenticated_base_permissions: strings(&["*.read"]),
            unauthenticated_permissions: strings(&["*.read"]),
            guest_permissions: strings(&["*.read"]),
            creation_permissions: strings(&["catalog.entity.create", "catalog.location.create"]),
            always_allow_prefixes: strings(&["scaffolder."]),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}
