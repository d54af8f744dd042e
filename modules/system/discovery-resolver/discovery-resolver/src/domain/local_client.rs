//! Local (in-process) client for the discovery resolver.

use std::sync::Arc;

use async_trait::async_trait;
use discovery_resolver_sdk::{DiscoveryClient, DiscoveryError};
use url::Url;

use super::Service;

/// Local client wrapping the service.
#[derive(Debug, Clone)]
pub struct DiscoveryLocalClient {
    svc: Arc<Service>,
}

impl DiscoveryLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl DiscoveryClient for DiscoveryLocalClient {
    async fn resolve_internal(&self, plugin_id: &str) -> Result<Url, DiscoveryError> {
        self.svc.resolve_internal(plugin_id)
    }

    async fn resolve_external(&self, plugin_id: &str) -> Result<Url, DiscoveryError> {
        self.svc.resolve_external(plugin_id)
    }
}
