//! Policy Enforcement Point (`PEP`) object.
//!
//! [`PolicyEnforcer`] encapsulates the full PEP flow:
//! build authorization request → call the policy → resolve conditions
//! against the resource.
//!
//! Constructed once during service initialisation with the policy client and
//! shared by every handler.

use std::sync::Arc;

use portal_security::RequesterIdentity;

use crate::api::PermissionPolicyClient;
use crate::conditions::CatalogEntity;
use crate::error::AuthZResolverError;
use crate::models::{AuthorizationRequest, AuthorizeResult, Permission, PolicyDecision};

/// Error from the PEP enforcement flow.
#[derive(Debug, thiserror::Error)]
pub enum EnforcerError {
    /// The policy denied access, either outright or after resolving a condition.
    #[error("access denied: {permission}")]
    Denied { permission: String },

    /// The policy answered conditionally but no resource was supplied.
    #[error("permission {permission} is conditional and requires a resource")]
    ResourceRequired { permission: String },

    /// The policy call failed.
    #[error("authorization evaluation failed: {0}")]
    EvaluationFailed(#[from] AuthZResolverError),
}

/// Policy Enforcement Point.
///
/// Cloneable and cheap to pass around (`Arc` inside).
///
/// # Example
///
/// ```ignore
/// use authz_resolver_sdk::{CatalogEntity, Permission, pep::PolicyEnforcer};
///
/// let enforcer = PolicyEnforcer::new(policy.clone());
///
/// // Basic permission
/// enforcer.enforce(requester.as_ref(), &Permission::basic("catalog.entity.create"), None).await?;
///
/// // Resource permission: conditions are resolved against the entity
/// enforcer.enforce(requester.as_ref(), &update_permission, Some(&entity)).await?;
/// ```
#[derive(Clone)]
pub struct PolicyEnforcer {
    policy: Arc<dyn PermissionPolicyClient>,
}

impl PolicyEnforcer {
    #[must_use]
    pub fn new(policy: Arc<dyn PermissionPolicyClient>) -> Self {
        Self { policy }
    }

    /// Build a request for the given requester and permission.
    #[must_use]
    pub fn build_request(
        &self,
        requester: Option<&RequesterIdentity>,
        permission: &Permission,
    ) -> AuthorizationRequest {
        AuthorizationRequest::new(permission.clone(), requester.cloned())
    }

    /// Ask the policy and return its raw decision.
    ///
    /// # Errors
    ///
    /// [`EnforcerError::EvaluationFailed`] if the policy call fails.
    pub async fn decide(
        &self,
        requester: Option<&RequesterIdentity>,
        permission: &Permission,
    ) -> Result<PolicyDecision, EnforcerError> {
        let request = self.build_request(requester, permission);
        Ok(self.policy.evaluate(request).await?)
    }

    /// Ask the policy and resolve any condition against `resource`.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::ResourceRequired`] if the decision is conditional and `resource` is `None`
    /// - [`EnforcerError::EvaluationFailed`] if the policy call fails
    pub async fn authorize(
        &self,
        requester: Option<&RequesterIdentity>,
        permission: &Permission,
        resource: Option<&CatalogEntity>,
    ) -> Result<AuthorizeResult, EnforcerError> {
        match self.decide(requester, permission).await? {
            PolicyDecision::Allow => Ok(AuthorizeResult::Allow),
            PolicyDecision::Deny => Ok(AuthorizeResult::Deny),
            PolicyDecision::Conditional(conditional) => match resource {
                Some(entity) => Ok(conditional.apply(entity)),
                None => Err(EnforcerError::ResourceRequired {
                    permission: permission.name.clone(),
                }),
            },
        }
    }

    /// Like [`Self::authorize`], but a deny becomes [`EnforcerError::Denied`]
    /// so handlers can use `?`.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::Denied`] if access is denied
    /// - [`EnforcerError::ResourceRequired`] if the decision is conditional and `resource` is `None`
    /// - [`EnforcerError::EvaluationFailed`] if the policy call fails
    pub async fn enforce(
        &self,
        requester: Option<&RequesterIdentity>,
        permission: &Permission,
        resource: Option<&CatalogEntity>,
    ) -> Result<(), EnforcerError> {
        match self.authorize(requester, permission, resource).await? {
            AuthorizeResult::Allow => Ok(()),
            AuthorizeResult::Deny => Err(EnforcerError::Denied {
                permission: permission.name.clone(),
            }),
        }
    }
}

impl std::fmt::Debug for PolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcer").finish_non_exhaustive()
    }
}
