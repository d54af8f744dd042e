//! Public API trait for the discovery resolver.

use async_trait::async_trait;
use url::Url;

use crate::error::DiscoveryError;

/// Maps plugin ids to the base URLs of the backend process hosting them.
///
/// Registered once at startup and shared as `Arc<dyn DiscoveryClient>`:
///
/// ```ignore
/// let catalog = discovery.resolve_internal("catalog").await?;
/// let entities = http.get(catalog.join("entities")?).send().await?;
/// ```
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Base URL for service-to-service calls, e.g. `http://backend-catalog:7008/api/catalog`.
    ///
    /// # Errors
    ///
    /// - `UnknownPlugin` if the plugin id is not routed to any backend
    async fn resolve_internal(&self, plugin_id: &str) -> Result<Url, DiscoveryError>;

    /// Base URL reachable from the browser (OAuth callbacks, cookie-scoped assets).
    ///
    /// Plugins that are not browser-facing resolve to their internal URL.
    ///
    /// # Errors
    ///
    /// - `UnknownPlugin` if the plugin id is not routed to any backend
    async fn resolve_external(&self, plugin_id: &str) -> Result<Url, DiscoveryError>;
}
