//! Configuration for the discovery resolver.

use discovery_resolver_sdk::BackendGroup;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

/// Base URLs of the physical backends.
///
/// Internal URLs come from one environment variable per backend
/// (see [`BackendGroup::env_var`]); the external URL comes from the
/// application config (`backend.base_url`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryResolverConfig {
    /// Internal URL of `backend-catalog`.
    pub catalog_service_url: String,

    /// Internal URL of `backend-techdocs`.
    pub techdocs_service_url: String,

    /// Internal URL of `backend-main`.
    pub main_service_url: String,

    /// Browser-reachable base URL. Falls back to `main_service_url` when unset.
    pub external_base_url: Option<String>,
}

impl Default for DiscoveryResolverConfig {
    fn default() -> Self {
        Self {
            catalog_service_url: BackendGroup::Catalog.default_url().to_owned(),
            techdocs_service_url: BackendGroup::Techdocs.default_url().to_owned(),
            main_service_url: BackendGroup::Main.default_url().to_owned(),
            external_base_url: None,
        }
    }
}

impl DiscoveryResolverConfig {
    /// Figment layering the built-in defaults under the backend URL variables.
    #[must_use]
    pub fn figment() -> Figment {
        let keys = BackendGroup::ALL.map(BackendGroup::env_var);
        Figment::from(Serialized::defaults(Self::default())).merge(Env::raw().only(&keys))
    }

    /// Read the backend URLs from the environment.
    ///
    /// Empty variables count as unset.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a variable cannot be read as a string.
    pub fn from_env() -> Result<Self, figment::Error> {
        let cfg: Self = Self::figment().extract()?;
        Ok(cfg.with_blank_urls_defaulted())
    }

    /// Set the browser-facing base URL (usually `backend.base_url`).
    #[must_use]
    pub fn with_external_base_url(mut self, url: Option<String>) -> Self {
        self.external_base_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Configured internal URL for a backend.
    #[must_use]
    pub fn service_url(&self, group: BackendGroup) -> &str {
        match group {
            BackendGroup::Catalog => &self.catalog_service_url,
            BackendGroup::Techdocs => &self.techdocs_service_url,
            BackendGroup::Main => &self.main_service_url,
        }
    }

    fn with_blank_urls_defaulted(mut self) -> Self {
        for group in BackendGroup::ALL {
            let slot = match group {
                BackendGroup::Catalog => &mut self.catalog_service_url,
                BackendGroup::Techdocs => &mut self.techdocs_service_url,
                BackendGroup::Main => &mut self.main_service_url,
            };
            if slot.trim().is_empty() {
                group.default_url().clone_into(slot);
            }
        }
        self.external_base_url = self.external_base_url.filter(|u| !u.trim().is_empty());
        self
    }
}
