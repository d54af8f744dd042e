//! Discovery resolver module.

use std::sync::Arc;

use discovery_resolver_sdk::{DiscoveryClient, DiscoveryError};
use tracing::info;

use crate::config::DiscoveryResolverConfig;
use crate::domain::{DiscoveryLocalClient, RouteTable, Service};

/// Discovery resolver module.
///
/// Built once per backend process before it accepts traffic. Invalid
/// configuration fails the startup instead of surfacing on the first request.
#[derive(Debug, Clone)]
pub struct DiscoveryResolver {
    service: Arc<Service>,
}

impl DiscoveryResolver {
    pub const MODULE_NAME: &'static str = "discovery-resolver";

    /// Validate the configuration and build the route table.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidUrl`] for malformed base URLs.
    #[tracing::instrument(skip_all, fields(module = "discovery-resolver"))]
    pub fn init(cfg: &DiscoveryResolverConfig) -> Result<Self, DiscoveryError> {
        info!("Initializing {} module", Self::MODULE_NAME);

        let routes = RouteTable::build(cfg)?;
        let service = Arc::new(Service::new(routes));

        info!("{} module initialized successfully", Self::MODULE_NAME);
        Ok(Self { service })
    }

    #[must_use]
    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }

    /// Client handed to backend HTTP clients.
    #[must_use]
    pub fn client(&self) -> Arc<dyn DiscoveryClient> {
        Arc::new(DiscoveryLocalClient::new(Arc::clone(&self.service)))
    }
}
