//! Permission model.
//!
//! A permission is identified by a dot-separated name such as
//! `catalog.entity.read`. Resource permissions additionally name the type of
//! resource they guard, which lets the policy answer with a condition that
//! is evaluated later against the concrete resource.

use std::fmt;

use portal_security::RequesterIdentity;
use serde::{Deserialize, Serialize};

use crate::conditions::ConditionalDecision;

/// CRUD action declared by a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
}

impl PermissionAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Infer the action from the last segment of a permission name.
    ///
    /// `catalog.entity.delete` yields `Delete`; `scaffolder.action.execute`
    /// yields `None`.
    #[must_use]
    pub fn infer(permission_name: &str) -> Option<Self> {
        match permission_name.rsplit('.').next()? {
            "create" => Some(Self::Create),
            "read" => Some(Self::Read),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PermissionAction>,
}

/// Whether a permission guards a specific kind of resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PermissionKind {
    Basic,
    Resource { resource_type: String },
}

/// A named capability being requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    #[serde(default)]
    pub attributes: PermissionAttributes,
    #[serde(flatten)]
    pub kind: PermissionKind,
}

impl Permission {
    /// A permission not tied to any resource type.
    #[must_use]
    pub fn basic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: PermissionAttributes::default(),
            kind: PermissionKind::Basic,
        }
    }

    /// A permission guarding resources of `resource_type`.
    #[must_use]
    pub fn resource(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: PermissionAttributes::default(),
            kind: PermissionKind::Resource {
                resource_type: resource_type.into(),
            },
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: PermissionAction) -> Self {
        self.attributes.action = Some(action);
        self
    }

    /// Set the action from the last segment of the name, if it is a CRUD verb.
    #[must_use]
    pub fn with_inferred_action(mut self) -> Self {
        self.attributes.action = PermissionAction::infer(&self.name);
        self
    }

    #[must_use]
    pub fn action(&self) -> Option<PermissionAction> {
        self.attributes.action
    }

    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        match &self.kind {
            PermissionKind::Basic => None,
            PermissionKind::Resource { resource_type } => Some(resource_type),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One authorization question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub permission: Permission,
    /// `None` for unauthenticated requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<RequesterIdentity>,
}

impl AuthorizationRequest {
    #[must_use]
    pub fn new(permission: Permission, requester: Option<RequesterIdentity>) -> Self {
        Self {
            permission,
            requester,
        }
    }

    #[must_use]
    pub fn unauthenticated(permission: Permission) -> Self {
        Self::new(permission, None)
    }
}

/// Final outcome once every condition has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizeResult {
    Allow,
    Deny,
}

impl AuthorizeResult {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Answer of the permission policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyDecision {
    Allow,
    Deny,
    /// Allowed only for resources satisfying the condition.
    Conditional(ConditionalDecision),
}

impl PolicyDecision {
    /// Short label for logs and CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
            Self::Conditional(_) => "CONDITIONAL",
        }
    }

    /// The definitive result, if no resource is needed to decide.
    #[must_use]
    pub const fn definitive(&self) -> Option<AuthorizeResult> {
        match self {
            Self::Allow => Some(AuthorizeResult::Allow),
            Self::Deny => Some(AuthorizeResult::Deny),
            Self::Conditional(_) => None,
        }
    }
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::conditions::{CATALOG_ENTITY_RESOURCE_TYPE, PermissionCondition};
    use serde_json::json;

    #[test]
    fn infers_crud_action_from_last_segment() {
        assert_eq!(
            PermissionAction::infer("catalog.entity.delete"),
            Some(PermissionAction::Delete)
        );
        assert_eq!(
            PermissionAction::infer("catalog.location.create"),
            Some(PermissionAction::Create)
        );
        assert_eq!(PermissionAction::infer("scaffolder.action.execute"), None);
        assert_eq!(PermissionAction::infer(""), None);
    }

    #[test]
    fn resource_permission_exposes_its_type() {
        let p = Permission::resource("catalog.entity.update", CATALOG_ENTITY_RESOURCE_TYPE)
            .with_action(PermissionAction::Update);
        assert_eq!(p.resource_type(), Some("catalog-entity"));
        assert_eq!(p.action(), Some(PermissionAction::Update));
        assert_eq!(Permission::basic("catalog.entity.create").resource_type(), None);
    }

    #[test]
    fn permission_serializes_with_flattened_kind() {
        let p = Permission::resource("catalog.entity.read", "catalog-entity").with_inferred_action();
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({
                "name": "catalog.entity.read",
                "attributes": { "action": "read" },
                "type": "resource",
                "resource_type": "catalog-entity"
            })
        );

        let basic: Permission =
            serde_json::from_value(json!({ "name": "scaffolder.task.create", "type": "basic" }))
                .unwrap();
        assert_eq!(basic, Permission::basic("scaffolder.task.create"));
    }

    #[test]
    fn decision_wire_format() {
        assert_eq!(
            serde_json::to_value(PolicyDecision::Allow).unwrap(),
            json!({ "result": "ALLOW" })
        );

        let conditional = PolicyDecision::Conditional(ConditionalDecision::catalog_entity(
            PermissionCondition::IsEntityOwner {
                claims: vec!["user:default/alice".to_owned()],
            },
        ));
        let value = serde_json::to_value(&conditional).unwrap();
        assert_eq!(value["result"], "CONDITIONAL");
        assert_eq!(value["plugin_id"], "catalog");
        assert_eq!(value["resource_type"], "catalog-entity");
        assert_eq!(value["condition"]["rule"], "IS_ENTITY_OWNER");

        let back: PolicyDecision = serde_json::from_value(value).unwrap();
        assert_eq!(back, conditional);
    }

    #[test]
    fn only_conditional_needs_a_resource() {
        assert_eq!(PolicyDecision::Allow.definitive(), Some(AuthorizeResult::Allow));
        assert_eq!(PolicyDecision::Deny.definitive(), Some(AuthorizeResult::Deny));
        let conditional = PolicyDecision::Conditional(ConditionalDecision::catalog_entity(
            PermissionCondition::IsEntityOwner { claims: vec![] },
        ));
        assert_eq!(conditional.definitive(), None);
        assert_eq!(conditional.to_string(), "CONDITIONAL");
    }
}
