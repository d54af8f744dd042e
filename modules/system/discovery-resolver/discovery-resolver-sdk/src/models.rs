//! Plugin routing model.
//!
//! Plugins are routed by which physical backend process hosts them, not by
//! what they do. Both enumerations are closed: adding a plugin means adding a
//! variant here, and [`PluginId::backend`] forces it onto exactly one backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

/// A physical backend process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendGroup {
    /// `backend-catalog`, hosts the software catalog.
    Catalog,
    /// `backend-techdocs`, hosts documentation rendering.
    Techdocs,
    /// `backend-main`, hosts everything else, including auth.
    Main,
}

impl BackendGroup {
    pub const ALL: [Self; 3] = [Self::Catalog, Self::Techdocs, Self::Main];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Techdocs => "techdocs",
            Self::Main => "main",
        }
    }

    /// Environment variable holding this backend's internal base URL.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Catalog => "CATALOG_SERVICE_URL",
            Self::Techdocs => "TECHDOCS_SERVICE_URL",
            Self::Main => "MAIN_SERVICE_URL",
        }
    }

    /// Local development URL used when the environment variable is unset.
    #[must_use]
    pub const fn default_url(self) -> &'static str {
        match self {
            Self::Catalog => "http://localhost:7008",
            Self::Techdocs => "http://localhost:7009",
            Self::Main => "http://localhost:7007",
        }
    }

    /// Plugins hosted by this backend.
    pub fn plugins(self) -> impl Iterator<Item = PluginId> {
        PluginId::ALL.into_iter().filter(move |p| p.backend() == self)
    }
}

impl fmt::Display for BackendGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown backend '{s}' (expected catalog, techdocs or main)"))
    }
}

/// Logical plugin identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginId {
    Catalog,
    Techdocs,
    // Core
    Auth,
    Proxy,
    Permission,
    // Features
    Scaffolder,
    Search,
    Kubernetes,
    // Integrations
    Notifications,
    Signals,
    Events,
    // Community
    Announcements,
    Categories,
    Tags,
    Adr,
}

impl PluginId {
    pub const ALL: [Self; 15] = [
        Self::Catalog,
        Self::Techdocs,
        Self::Auth,
        Self::Proxy,
        Self::Permission,
        Self::Scaffolder,
        Self::Search,
        Self::Kubernetes,
        Self::Notifications,
        Self::Signals,
        Self::Events,
        Self::Announcements,
        Self::Categories,
        Self::Tags,
        Self::Adr,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Techdocs => "techdocs",
            Self::Auth => "auth",
            Self::Proxy => "proxy",
            Self::Permission => "permission",
            Self::Scaffolder => "scaffolder",
            Self::Search => "search",
            Self::Kubernetes => "kubernetes",
            Self::Notifications => "notifications",
            Self::Signals => "signals",
            Self::Events => "events",
            Self::Announcements => "announcements",
            Self::Categories => "categories",
            Self::Tags => "tags",
            Self::Adr => "adr",
        }
    }

    /// The backend process hosting this plugin.
    #[must_use]
    pub const fn backend(self) -> BackendGroup {
        match self {
            Self::Catalog => BackendGroup::Catalog,
            Self::Techdocs => BackendGroup::Techdocs,
            Self::Auth
            | Self::Proxy
            | Self::Permission
            | Self::Scaffolder
            | Self::Search
            | Self::Kubernetes
            | Self::Notifications
            | Self::Signals
            | Self::Events
            | Self::Announcements
            | Self::Categories
            | Self::Tags
            | Self::Adr => BackendGroup::Main,
        }
    }

    /// Whether browser traffic for this plugin must use the external base URL.
    ///
    /// Main-backend plugins serve OAuth callbacks and other browser endpoints.
    /// Techdocs serves static files behind a cookie whose domain must match
    /// the browser origin. The catalog is only called backend-to-backend.
    #[must_use]
    pub const fn is_browser_facing(self) -> bool {
        matches!(self.backend(), BackendGroup::Main | BackendGroup::Techdocs)
    }

    /// Every known plugin id, in route-table order.
    #[must_use]
    pub fn known_ids() -> Vec<String> {
        Self::ALL.iter().map(|p| p.as_str().to_owned()).collect()
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginId {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DiscoveryError::UnknownPlugin {
                plugin_id: s.to_owned(),
                available: Self::known_ids(),
            })
    }
}
