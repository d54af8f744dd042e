//! Domain service for the discovery resolver.

use discovery_resolver_sdk::{BackendGroup, DiscoveryError};
use tracing::{debug, error, info, warn};
use url::Url;

use super::routes::{PluginRoute, RouteTable};

/// Discovery service for the multi-backend deployment.
///
/// Holds the route table built at startup and never mutates it, so it can be
/// shared freely between concurrently handled requests.
#[derive(Debug)]
pub struct Service {
    routes: RouteTable,
}

impl Service {
    #[must_use]
    pub fn new(routes: RouteTable) -> Self {
        let svc = Self { routes };
        svc.log_initialization();
        svc
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    fn log_initialization(&self) {
        info!("Setting up discovery service for multi-backend architecture");

        if self.routes.using_fallback() {
            warn!(
                external_base_url = %self.routes.external_base_url(),
                "Using main service URL as external base URL (backend.base_url not set); \
                 fine for local development, configure it for containerized deployments"
            );
        }

        debug!(
            external_base_url = %self.routes.external_base_url(),
            catalog_service_url = ?self.routes.service_url(BackendGroup::Catalog),
            techdocs_service_url = ?self.routes.service_url(BackendGroup::Techdocs),
            main_service_url = ?self.routes.service_url(BackendGroup::Main),
            using_fallback = self.routes.using_fallback(),
            total_plugins = self.routes.len(),
            catalog_plugins = BackendGroup::Catalog.plugins().count(),
            techdocs_plugins = BackendGroup::Techdocs.plugins().count(),
            main_plugins = BackendGroup::Main.plugins().count(),
            "Discovery configuration loaded"
        );
        info!("Discovery service configured");
    }

    fn lookup(&self, plugin_id: &str) -> Result<&PluginRoute, DiscoveryError> {
        self.routes.route(plugin_id).inspect_err(|e| {
            if let DiscoveryError::UnknownPlugin { available, .. } = e {
                error!(
                    plugin_id,
                    available_plugins = ?available,
                    "No service URL configured for plugin"
                );
            }
        })
    }

    /// Internal base URL of the plugin (`{backend}/api/{plugin}`).
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnknownPlugin`] if the id is not routed.
    pub fn resolve_internal(&self, plugin_id: &str) -> Result<Url, DiscoveryError> {
        let route = self.lookup(plugin_id)?;
        debug!(plugin_id, url = %route.internal_url, backend = %route.backend, "Internal discovery");
        Ok(route.internal_url.clone())
    }

    /// External base URL for browser-facing plugins, internal URL otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnknownPlugin`] if the id is not routed.
    pub fn resolve_external(&self, plugin_id: &str) -> Result<Url, DiscoveryError> {
        let route = self.lookup(plugin_id)?;
        if let Some(url) = &route.external_url {
            debug!(plugin_id, url = %url, kind = "external", "External discovery");
            return Ok(url.clone());
        }

        debug!(
            plugin_id,
            url = %route.internal_url,
            kind = "internal",
            "External discovery delegating to internal URL"
        );
        Ok(route.internal_url.clone())
    }
}
