//! Startup environment report.

use discovery_resolver_sdk::BackendGroup;
use serde::Serialize;
use tracing::{debug, info};

pub const BACKEND_SECRET_VAR: &str = "BACKEND_SECRET";

const NOT_SET: &str = "not set";

/// What a backend process sees in its environment at startup.
///
/// Only records whether the backend secret is present, never its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    pub role: BackendGroup,
    pub catalog_service_url: Option<String>,
    pub techdocs_service_url: Option<String>,
    pub main_service_url: Option<String>,
    pub backend_secret_configured: bool,
}

impl StartupReport {
    #[must_use]
    pub fn from_env(role: BackendGroup) -> Self {
        Self::from_lookup(role, |key| std::env::var(key).ok())
    }

    /// Build the report from an arbitrary variable lookup. Blank values count as unset.
    #[must_use]
    pub fn from_lookup<F>(role: BackendGroup, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            role,
            catalog_service_url: var(BackendGroup::Catalog.env_var()),
            techdocs_service_url: var(BackendGroup::Techdocs.env_var()),
            main_service_url: var(BackendGroup::Main.env_var()),
            backend_secret_configured: var(BACKEND_SECRET_VAR).is_some(),
        }
    }

    pub fn log(&self) {
        info!(role = %self.role, "Backend {} starting up", self.role);
        debug!(
            catalog_service_url = self.catalog_service_url.as_deref().unwrap_or(NOT_SET),
            techdocs_service_url = self.techdocs_service_url.as_deref().unwrap_or(NOT_SET),
            main_service_url = self.main_service_url.as_deref().unwrap_or(NOT_SET),
            backend_secret_configured = self.backend_secret_configured,
            "Environment configuration"
        );
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tracing_test::traced_test;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn reads_service_urls_and_secret_presence() {
        let report = StartupReport::from_lookup(
            BackendGroup::Catalog,
            lookup(&[
                ("CATALOG_SERVICE_URL", "http://backend-catalog:7008"),
                ("BACKEND_SECRET", "s3cr3t"),
            ]),
        );
        assert_eq!(
            report.catalog_service_url.as_deref(),
            Some("http://backend-catalog:7008")
        );
        assert!(report.main_service_url.is_none());
        assert!(report.backend_secret_configured);
    }

    #[test]
    fn blank_secret_is_not_configured() {
        let report = StartupReport::from_lookup(BackendGroup::Main, lookup(&[("BACKEND_SECRET", " ")]));
        assert!(!report.backend_secret_configured);
    }

    #[test]
    #[traced_test]
    fn log_never_contains_the_secret() {
        let report = StartupReport::from_lookup(
            BackendGroup::Techdocs,
            lookup(&[("BACKEND_SECRET", "s3cr3t-value")]),
        );
        report.log();

        assert!(logs_contain("Backend techdocs starting up"));
        assert!(logs_contain("backend_secret_configured=true"));
        assert!(logs_contain("not set"));
        assert!(!logs_contain("s3cr3t-value"));
    }
}
