//! Group permission policy plugin module.

use std::sync::Arc;

use authz_resolver_sdk::PermissionPolicyClient;
use tracing::{debug, info};

use crate::config::PermissionPolicyConfig;
use crate::domain::{CompiledPolicy, PolicyConfigError, Service};

/// Group permission policy plugin module.
#[derive(Debug, Clone)]
pub struct GroupPolicyPlugin {
    service: Arc<Service>,
}

impl GroupPolicyPlugin {
    pub const MODULE_NAME: &'static str = "group-policy-plugin";

    /// Validate the configuration and install the policy.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyConfigError`] if the configuration is inconsistent.
    #[tracing::instrument(skip_all, fields(module = "group-policy-plugin"))]
    pub fn init(cfg: &PermissionPolicyConfig) -> Result<Self, PolicyConfigError> {
        info!("Setting up group permission policy");

        let policy = CompiledPolicy::compile(cfg)?;
        let summary = policy.summary();
        debug!(
            special_groups = ?summary.special_groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
            guest_refs = summary.guest_refs,
            unauthenticated_permissions = summary.unauthenticated_permissions,
            authenticated_base_permissions = summary.authenticated_base_permissions,
            always_allow_prefixes = ?summary.always_allow_prefixes,
            "Permission configuration loaded"
        );

        let service = Arc::new(Service::new(policy));
        info!("Permission policy installed");
        Ok(Self { service })
    }

    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }

    /// Client handed to authorization call sites.
    #[must_use]
    pub fn client(&self) -> Arc<dyn PermissionPolicyClient> {
        Arc::clone(&self.service) as Arc<dyn PermissionPolicyClient>
    }
}
