//! Immutable plugin route table.

use std::collections::BTreeMap;

use discovery_resolver_sdk::{BackendGroup, DiscoveryError, PluginId};
use url::Url;

use crate::config::DiscoveryResolverConfig;

/// Routing entry for one plugin. Both URLs already carry the `/api/{plugin}` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRoute {
    pub plugin: PluginId,
    pub backend: BackendGroup,
    pub internal_url: Url,
    /// Present only for browser-facing plugins.
    pub external_url: Option<Url>,
}

impl PluginRoute {
    #[must_use]
    pub fn is_browser_facing(&self) -> bool {
        self.external_url.is_some()
    }
}

/// Every known plugin mapped to its backend, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: BTreeMap<PluginId, PluginRoute>,
    service_urls: BTreeMap<BackendGroup, String>,
    external_base_url: String,
    using_fallback: bool,
}

impl RouteTable {
    /// Validate the configured URLs and build the table.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidUrl`] if a base URL is not an absolute
    /// `http`/`https` URL.
    pub fn build(cfg: &DiscoveryResolverConfig) -> Result<Self, DiscoveryError> {
        let mut service_urls = BTreeMap::new();
        for group in BackendGroup::ALL {
            let url = validate_base_url(group.env_var(), cfg.service_url(group))?;
            service_urls.insert(group, url);
        }

        let main_url = service_urls
            .get(&BackendGroup::Main)
            .cloned()
            .unwrap_or_default();
        let external_base_url = match cfg.external_base_url.as_deref() {
            Some(url) => validate_base_url("backend.base_url", url)?,
            None => main_url.clone(),
        };
        let using_fallback = external_base_url == main_url;

        let mut routes = BTreeMap::new();
        for plugin in PluginId::ALL {
            let backend = plugin.backend();
            let base = service_urls
                .get(&backend)
                .map_or(main_url.as_str(), String::as_str);
            let internal_url = api_url(backend.env_var(), base, plugin)?;
            let external_url = if plugin.is_browser_facing() {
                Some(api_url("backend.base_url", &external_base_url, plugin)?)
            } else {
                None
            };
            routes.insert(
                plugin,
                PluginRoute {
                    plugin,
                    backend,
                    internal_url,
                    external_url,
                },
            );
        }

        Ok(Self {
            routes,
            service_urls,
            external_base_url,
            using_fallback,
        })
    }

    /// Look up a plugin by its raw id.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::UnknownPlugin`] naming the id and every known id.
    pub fn route(&self, plugin_id: &str) -> Result<&PluginRoute, DiscoveryError> {
        let plugin: PluginId = plugin_id.parse()?;
        self.routes
            .get(&plugin)
            .ok_or_else(|| DiscoveryError::UnknownPlugin {
                plugin_id: plugin_id.to_owned(),
                available: self.known_ids(),
            })
    }

    /// Known plugin ids in table order.
    #[must_use]
    pub fn known_ids(&self) -> Vec<String> {
        self.routes.keys().map(|p| p.as_str().to_owned()).collect()
    }

    pub fn routes(&self) -> impl Iterator<Item = &PluginRoute> {
        self.routes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Normalized internal base URL of a backend (no trailing slash).
    #[must_use]
    pub fn service_url(&self, group: BackendGroup) -> Option<&str> {
        self.service_urls.get(&group).map(String::as_str)
    }

    #[must_use]
    pub fn external_base_url(&self) -> &str {
        &self.external_base_url
    }

    /// `true` when the external URL is the main backend's internal URL.
    #[must_use]
    pub fn using_fallback(&self) -> bool {
        self.using_fallback
    }
}

fn validate_base_url(key: &str, raw: &str) -> Result<String, DiscoveryError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| DiscoveryError::InvalidUrl {
        key: key.to_owned(),
        url: raw.to_owned(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("URL has no host".to_owned()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("base URL must not carry a query or fragment".to_owned()));
    }

    Ok(trimmed.to_owned())
}

fn api_url(key: &str, base: &str, plugin: PluginId) -> Result<Url, DiscoveryError> {
    let full = format!("{base}/api/{plugin}");
    Url::parse(&full).map_err(|e| DiscoveryError::InvalidUrl {
        key: key.to_owned(),
        url: full.clone(),
        reason: e.to_string(),
    })
}
