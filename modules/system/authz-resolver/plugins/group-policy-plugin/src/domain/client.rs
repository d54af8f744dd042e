//! Client implementation for the group permission policy plugin.

use async_trait::async_trait;
use authz_resolver_sdk::{
    AuthZResolverError, AuthorizationRequest, PermissionPolicyClient, PolicyDecision,
};

use super::service::Service;

#[async_trait]
impl PermissionPolicyClient for Service {
    async fn evaluate(
        &self,
        request: AuthorizationRequest,
    ) -> Result<PolicyDecision, AuthZResolverError> {
        Ok(Service::evaluate(self, &request))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::PermissionPolicyConfig;
    use crate::domain::policy::CompiledPolicy;
    use authz_resolver_sdk::Permission;

    #[tokio::test]
    async fn plugin_trait_evaluates_successfully() {
        let service =
            Service::new(CompiledPolicy::compile(&PermissionPolicyConfig::default()).unwrap());
        let policy: &dyn PermissionPolicyClient = &service;

        let request =
            AuthorizationRequest::unauthenticated(Permission::basic("catalog.entity.read"));
        let result = policy.evaluate(request).await;
        assert_eq!(result.unwrap(), PolicyDecision::Allow);
    }
}
