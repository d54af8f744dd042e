//! Kubernetes cluster list supplier.
//!
//! The kubernetes plugin reads the current cluster list from this supplier.
//! The list is rebuilt from configuration on a fixed interval by a periodic
//! task; a failed rebuild keeps the previous list.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, ensure};
use parking_lot::RwLock;
use portal_utils::{PeriodicTask, run_periodically};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

fn default_auth_provider() -> String {
    "serviceAccount".to_owned()
}

/// Connection details of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterDetails {
    pub name: String,
    pub url: String,
    #[serde(default = "default_auth_provider")]
    pub auth_provider: String,
}

#[derive(Debug, Default)]
pub struct ClustersSupplier {
    source: Vec<ClusterDetails>,
    clusters: RwLock<Vec<ClusterDetails>>,
}

impl ClustersSupplier {
    /// Empty until the first refresh.
    #[must_use]
    pub fn new(source: Vec<ClusterDetails>) -> Self {
        Self {
            source,
            clusters: RwLock::new(Vec::new()),
        }
    }

    /// Start refreshing now and then every `interval`.
    #[must_use]
    pub fn start(self: &Arc<Self>, interval: Duration) -> PeriodicTask {
        let supplier = Arc::clone(self);
        info!(
            interval_secs = interval.as_secs(),
            "Starting kubernetes cluster refresh"
        );
        run_periodically("kubernetes-clusters", interval, move || {
            std::future::ready(supplier.refresh())
        })
    }

    /// Rebuild the cluster list.
    ///
    /// # Errors
    ///
    /// Fails if a cluster has an empty name or an invalid URL; the current
    /// list is left untouched.
    pub fn refresh(&self) -> anyhow::Result<()> {
        let mut next = Vec::with_capacity(self.source.len());
        for cluster in &self.source {
            ensure!(!cluster.name.trim().is_empty(), "cluster with empty name");
            let url = Url::parse(&cluster.url)
                .with_context(|| format!("invalid URL for cluster '{}'", cluster.name))?;
            ensure!(
                matches!(url.scheme(), "http" | "https"),
                "cluster '{}' URL must be http or https",
                cluster.name
            );
            next.push(cluster.clone());
        }

        debug!(clusters = next.len(), "Kubernetes clusters refreshed");
        *self.clusters.write() = next;
        Ok(())
    }

    /// Snapshot of the current cluster list.
    #[must_use]
    pub fn clusters(&self) -> Vec<ClusterDetails> {
        self.clusters.read().clone()
    }
}
