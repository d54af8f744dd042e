//! Public API trait for the permission policy.

use async_trait::async_trait;

use crate::error::AuthZResolverError;
use crate::models::{AuthorizationRequest, PolicyDecision};

/// Public API trait of the permission policy.
///
/// Implemented by the policy plugin and consumed by request handlers,
/// usually through [`crate::pep::PolicyEnforcer`]:
///
/// ```ignore
/// let decision = policy.evaluate(AuthorizationRequest::new(permission, requester)).await?;
/// ```
#[async_trait]
pub trait PermissionPolicyClient: Send + Sync {
    /// Evaluate an authorization request.
    ///
    /// Pure with respect to the request: the same request always yields the
    /// same decision.
    ///
    /// # Errors
    ///
    /// `Internal` for unexpected errors in the client implementation.
    async fn evaluate(
        &self,
        request: AuthorizationRequest,
    ) -> Result<PolicyDecision, AuthZResolverError>;
}
