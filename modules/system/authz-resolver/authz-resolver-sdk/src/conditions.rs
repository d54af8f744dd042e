//! Conditional decisions.
//!
//! When the policy cannot decide without seeing the resource, it returns a
//! [`ConditionalDecision`]: the owning plugin evaluates the condition against
//! each entity and only then allows or denies.

use portal_security::NormalizedRefs;
use serde::{Deserialize, Serialize};

use crate::models::AuthorizeResult;

/// Plugin that evaluates catalog entity conditions.
pub const CATALOG_PLUGIN_ID: &str = "catalog";

/// Resource type of software catalog entities.
pub const CATALOG_ENTITY_RESOURCE_TYPE: &str = "catalog-entity";

/// A rule evaluated against one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionCondition {
    /// Satisfied when the entity is owned by any of `claims`.
    IsEntityOwner { claims: Vec<String> },
}

/// The resource view a condition is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    /// e.g. `component:default/payments`.
    pub entity_ref: String,
    /// Targets of the entity's `ownedBy` relations.
    #[serde(default)]
    pub owner_refs: Vec<String>,
}

impl CatalogEntity {
    #[must_use]
    pub fn new<I, S>(entity_ref: impl Into<String>, owner_refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity_ref: entity_ref.into(),
            owner_refs: owner_refs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Allow-if-condition answer, scoped to one plugin and resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalDecision {
    pub plugin_id: String,
    pub resource_type: String,
    pub condition: PermissionCondition,
}

impl ConditionalDecision {
    /// A condition evaluated by the catalog against catalog entities.
    #[must_use]
    pub fn catalog_entity(condition: PermissionCondition) -> Self {
        Self {
            plugin_id: CATALOG_PLUGIN_ID.to_owned(),
            resource_type: CATALOG_ENTITY_RESOURCE_TYPE.to_owned(),
            condition,
        }
    }

    /// Resolve the condition for a single entity.
    ///
    /// Reference comparison is case-insensitive.
    #[must_use]
    pub fn apply(&self, entity: &CatalogEntity) -> AuthorizeResult {
        match &self.condition {
            PermissionCondition::IsEntityOwner { claims } => {
                let claims: NormalizedRefs = claims.iter().collect();
                let owners: NormalizedRefs = entity.owner_refs.iter().collect();
                if claims.intersects(&owners) {
                    AuthorizeResult::Allow
                } else {
                    AuthorizeResult::Deny
                }
            }
        }
    }
}
