//! Application configuration.
//!
//! Layers, lowest priority first: built-in defaults, the optional YAML file
//! given with `--config`, then `PORTAL__`-prefixed environment variables with
//! `__` separating nested keys (`PORTAL__BACKEND__BASE_URL`).
//!
//! Backend service URLs are not part of this tree; they come from
//! `CATALOG_SERVICE_URL`, `TECHDOCS_SERVICE_URL` and `MAIN_SERVICE_URL`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use discovery_resolver::DiscoveryResolverConfig;
use discovery_resolver_sdk::BackendGroup;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use group_policy_plugin::PermissionPolicyConfig;
use serde::{Deserialize, Serialize};

use crate::clusters::ClusterDetails;

pub const ENV_PREFIX: &str = "PORTAL__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub permission: PermissionPolicyConfig,
    pub kubernetes: KubernetesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Which backend process this is.
    pub role: BackendGroup,
    /// Browser-reachable base URL of the portal.
    pub base_url: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            role: BackendGroup::Main,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KubernetesConfig {
    pub refresh_interval_secs: u64,
    pub clusters: Vec<ClusterDetails>,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60 * 60,
            clusters: Vec::new(),
        }
    }
}

impl KubernetesConfig {
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl AppConfig {
    /// Figment with every layer applied.
    ///
    /// `permission` has no defaults layer: figment merges maps key by key, so
    /// layering the default groups would keep them alive under an operator's
    /// own `special_groups`. Missing permission fields are filled by serde
    /// instead, which replaces each map as a whole.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let defaults = Self::default();
        let mut figment = Figment::new()
            .merge(Serialized::default("backend", &defaults.backend))
            .merge(Serialized::default("logging", &defaults.logging))
            .merge(Serialized::default("kubernetes", &defaults.kubernetes));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and deserialize the configuration.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly given file does not exist, or if any layer
    /// cannot be parsed into [`AppConfig`].
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            bail!("config file not found: {}", path.display());
        }

        let cfg: Self = Self::figment(path)
            .extract()
            .context("failed to load portal configuration")?;

        if cfg.kubernetes.refresh_interval_secs == 0 {
            bail!("kubernetes.refresh_interval_secs must be greater than zero");
        }
        Ok(cfg)
    }

    /// Discovery settings: backend URLs from the environment plus `backend.base_url`.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a backend URL variable cannot be read.
    pub fn discovery(&self) -> Result<DiscoveryResolverConfig, figment::Error> {
        Ok(DiscoveryResolverConfig::from_env()?.with_external_base_url(self.backend.base_url.clone()))
    }
}
