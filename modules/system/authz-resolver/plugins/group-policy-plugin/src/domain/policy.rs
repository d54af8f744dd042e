//! Validated, precompiled policy tables.

use std::collections::HashSet;

use portal_security::{EntityRef, NormalizedRefs};
use serde::Serialize;

use super::error::PolicyConfigError;
use super::matcher::PermissionSet;
use crate::config::PermissionPolicyConfig;

/// A special group with its lowercased member references and grants.
#[derive(Debug, Clone)]
pub struct GroupRule {
    pub name: String,
    pub members: NormalizedRefs,
    pub grants: PermissionSet,
}

/// Everything the evaluator consults, built once from [`PermissionPolicyConfig`].
#[derive(Debug, Clone)]
pub struct CompiledPolicy {
    pub guest_group: NormalizedRefs,
    pub groups: Vec<GroupRule>,
    pub authenticated_base: PermissionSet,
    pub unauthenticated: PermissionSet,
    pub guest: PermissionSet,
    pub creation: HashSet<String>,
    pub always_allow_prefixes: Vec<String>,
}

impl CompiledPolicy {
    /// Validate the configuration and compile every pattern.
    ///
    /// Every special group must have a non-empty permission set and every
    /// permission set must belong to a declared group. Member references are
    /// parsed as entity refs; a missing namespace becomes `default`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PolicyConfigError`] found.
    pub fn compile(cfg: &PermissionPolicyConfig) -> Result<Self, PolicyConfigError> {
        if cfg.guest_group.iter().all(|r| r.trim().is_empty()) {
            return Err(PolicyConfigError::EmptyGuestGroup);
        }

        if let Some(group) = cfg
            .group_permissions
            .keys()
            .find(|g| !cfg.special_groups.contains_key(*g))
        {
            return Err(PolicyConfigError::UndeclaredGroup {
                group: group.clone(),
            });
        }

        let mut groups = Vec::with_capacity(cfg.special_groups.len());
        for (name, members) in &cfg.special_groups {
            if members.iter().all(|r| r.trim().is_empty()) {
                return Err(PolicyConfigError::EmptyGroup {
                    group: name.clone(),
                });
            }
            let grants = match cfg.group_permissions.get(name) {
                Some(patterns) if !patterns.is_empty() => {
                    PermissionSet::compile(&format!("group_permissions.{name}"), patterns)?
                }
                _ => {
                    return Err(PolicyConfigError::MissingPermissionSet {
                        group: name.clone(),
                    });
                }
            };
            groups.push(GroupRule {
                name: name.clone(),
                members: parse_refs(&format!("special_groups.{name}"), members)?,
                grants,
            });
        }

        for (field, value) in [
            ("creation_permissions", &cfg.creation_permissions),
            ("always_allow_prefixes", &cfg.always_allow_prefixes),
        ] {
            if let Some(bad) = value.iter().find(|v| v.trim().is_empty()) {
                return Err(PolicyConfigError::InvalidPattern {
                    field: field.to_owned(),
                    pattern: bad.clone(),
                    reason: "entry is empty".to_owned(),
                });
            }
        }

        Ok(Self {
            guest_group: parse_refs("guest_group", &cfg.guest_group)?,
            groups,
            authenticated_base: PermissionSet::compile(
                "authenticated_base_permissions",
                &cfg.authenticated_base_permissions,
            )?,
            unauthenticated: PermissionSet::compile(
                "unauthenticated_permissions",
                &cfg.unauthenticated_permissions,
            )?,
            guest: PermissionSet::compile("guest_permissions", &cfg.guest_permissions)?,
            creation: cfg.creation_permissions.iter().cloned().collect(),
            always_allow_prefixes: cfg.always_allow_prefixes.clone(),
        })
    }

    #[must_use]
    pub fn summary(&self) -> PolicySummary {
        PolicySummary {
            guest_refs: self.guest_group.len(),
            special_groups: self
                .groups
                .iter()
                .map(|g| GroupSummary {
                    name: g.name.clone(),
                    members: g.members.len(),
                    patterns: g.grants.len(),
                })
                .collect(),
            authenticated_base_permissions: self.authenticated_base.len(),
            unauthenticated_permissions: self.unauthenticated.len(),
            guest_permissions: self.guest.len(),
            creation_permissions: self.creation.len(),
            always_allow_prefixes: self.always_allow_prefixes.clone(),
        }
    }
}

/// Parse the non-blank references of `field` into their lowercased canonical form.
fn parse_refs(field: &str, refs: &[String]) -> Result<NormalizedRefs, PolicyConfigError> {
    refs.iter()
        .filter(|r| !r.trim().is_empty())
        .map(|raw| {
            raw.parse::<EntityRef>()
                .map(|r| r.to_normalized_string())
                .map_err(|e| PolicyConfigError::InvalidEntityRef {
                    field: field.to_owned(),
                    entity_ref: raw.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Counts describing a loaded policy, for startup logs and `check-config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySummary {
    pub guest_refs: usize,
    pub special_groups: Vec<GroupSummary>,
    pub authenticated_base_permissions: usize,
    pub unauthenticated_permissions: usize,
    pub guest_permissions: usize,
    pub creation_permissions: usize,
    pub always_allow_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub members: usize,
    pub patterns: usize,
}
