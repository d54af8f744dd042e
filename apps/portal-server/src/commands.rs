//! Subcommand implementations.

use std::sync::Arc;

use anyhow::Context;
use authz_resolver_sdk::{
    AuthorizationRequest, AuthorizeResult, CatalogEntity, Permission, PolicyDecision,
};
use discovery_resolver::{DiscoveryResolver, RouteTable};
use discovery_resolver_sdk::{BackendGroup, PluginId};
use group_policy_plugin::{GroupPolicyPlugin, PolicySummary};
use portal_security::RequesterIdentity;
use serde::Serialize;
use tracing::info;

use crate::clusters::ClustersSupplier;
use crate::config::AppConfig;
use crate::startup::StartupReport;

/// Both components, built and validated.
#[derive(Debug, Clone)]
pub struct Components {
    pub discovery: DiscoveryResolver,
    pub policy: GroupPolicyPlugin,
}

impl Components {
    /// # Errors
    ///
    /// Fails on invalid discovery or permission configuration.
    pub fn init(cfg: &AppConfig) -> anyhow::Result<Self> {
        let discovery = DiscoveryResolver::init(&cfg.discovery()?)
            .context("invalid discovery configuration")?;
        let policy =
            GroupPolicyPlugin::init(&cfg.permission).context("invalid permission configuration")?;
        Ok(Self { discovery, policy })
    }
}

/// `resolve <plugin-id> [--external]`
///
/// # Errors
///
/// Fails for unknown plugin ids or invalid configuration.
pub async fn resolve(cfg: &AppConfig, plugin_id: &str, external: bool) -> anyhow::Result<String> {
    let discovery = DiscoveryResolver::init(&cfg.discovery()?)?;
    let client = discovery.client();
    let url = if external {
        client.resolve_external(plugin_id).await?
    } else {
        client.resolve_internal(plugin_id).await?
    };
    Ok(url.to_string())
}

/// Inputs of the `authorize` command.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeInput {
    pub permission: String,
    pub resource_type: Option<String>,
    pub user: Option<String>,
    pub refs: Vec<String>,
    /// Owners of the target entity, used to resolve a conditional decision.
    pub owners: Vec<String>,
}

impl AuthorizeInput {
    #[must_use]
    pub fn permission(&self) -> Permission {
        let permission = match &self.resource_type {
            Some(resource_type) => Permission::resource(&self.permission, resource_type),
            None => Permission::basic(&self.permission),
        };
        permission.with_inferred_action()
    }

    #[must_use]
    pub fn requester(&self) -> Option<RequesterIdentity> {
        let user = self.user.as_ref()?;
        Some(
            RequesterIdentity::builder()
                .user_entity_ref(user)
                .ownership_entity_refs(&self.refs)
                .build(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizeOutput {
    pub permission: String,
    pub decision: PolicyDecision,
    /// Present when the decision was conditional and owners were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<AuthorizeResult>,
}

/// `authorize <permission> [--resource-type ..] [--user ..] [--ref ..]... [--owner ..]...`
///
/// # Errors
///
/// Fails on invalid permission configuration, or when ownership refs are
/// given without a user.
pub async fn authorize(cfg: &AppConfig, input: &AuthorizeInput) -> anyhow::Result<AuthorizeOutput> {
    if input.user.is_none() && !input.refs.is_empty() {
        anyhow::bail!("--ref requires --user");
    }
    let plugin = GroupPolicyPlugin::init(&cfg.permission)?;
    let request = AuthorizationRequest::new(input.permission(), input.requester());
    let decision = plugin.client().evaluate(request).await?;

    let resolved = match &decision {
        PolicyDecision::Conditional(conditional) if !input.owners.is_empty() => {
            let entity = CatalogEntity::new("<cli>", input.owners.iter().map(String::as_str));
            Some(conditional.apply(&entity))
        }
        _ => decision.definitive(),
    };

    Ok(AuthorizeOutput {
        permission: input.permission.clone(),
        decision,
        resolved,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverySummary {
    pub external_base_url: String,
    pub using_fallback: bool,
    pub catalog_service_url: Option<String>,
    pub techdocs_service_url: Option<String>,
    pub main_service_url: Option<String>,
    pub plugins: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub role: BackendGroup,
    pub discovery: DiscoverySummary,
    pub permission: PolicySummary,
    pub kubernetes_clusters: usize,
}

/// `check-config`: load and validate everything, summarize.
///
/// # Errors
///
/// Fails on the first invalid component configuration.
pub fn check_config(cfg: &AppConfig) -> anyhow::Result<ConfigSummary> {
    let components = Components::init(cfg)?;
    ClustersSupplier::new(cfg.kubernetes.clusters.clone())
        .refresh()
        .context("invalid kubernetes cluster configuration")?;

    let routes = components.discovery.service().routes();
    let url = |group| routes.service_url(group).map(ToOwned::to_owned);
    Ok(ConfigSummary {
        role: cfg.backend.role,
        discovery: DiscoverySummary {
            external_base_url: routes.external_base_url().to_owned(),
            using_fallback: routes.using_fallback(),
            catalog_service_url: url(BackendGroup::Catalog),
            techdocs_service_url: url(BackendGroup::Techdocs),
            main_service_url: url(BackendGroup::Main),
            plugins: routes.len(),
        },
        permission: components.policy.service().policy().summary(),
        kubernetes_clusters: cfg.kubernetes.clusters.len(),
    })
}

/// `routes`: one line per plugin.
///
/// # Errors
///
/// Fails on invalid discovery configuration.
pub fn routes(cfg: &AppConfig) -> anyhow::Result<String> {
    let discovery = DiscoveryResolver::init(&cfg.discovery()?)?;
    Ok(render_routes(discovery.service().routes()))
}

#[must_use]
pub fn render_routes(table: &RouteTable) -> String {
    let header = format!("{:<14} {:<9} {:<44} EXTERNAL", "PLUGIN", "BACKEND", "INTERNAL");
    let rows = table.routes().map(|route| {
        let external = route.external_url.as_ref().map_or("-", url::Url::as_str);
        format!(
            "{:<14} {:<9} {:<44} {external}",
            route.plugin.as_str(),
            route.backend.as_str(),
            route.internal_url.as_str(),
        )
    });
    std::iter::once(header)
        .chain(rows)
        .map(|line| line + "\n")
        .collect()
}

/// Whether `plugin` runs on the backend with this role.
#[must_use]
pub fn hosts(role: BackendGroup, plugin: PluginId) -> bool {
    plugin.backend() == role
}

/// Default command: start the backend process and run until interrupted.
///
/// # Errors
///
/// Fails on invalid configuration or if the shutdown signal cannot be awaited.
pub async fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    let role = cfg.backend.role;
    StartupReport::from_env(role).log();

    let components = Components::init(cfg)?;

    let clusters = if hosts(role, PluginId::Kubernetes) {
        let supplier = Arc::new(ClustersSupplier::new(cfg.kubernetes.clusters.clone()));
        Some(supplier.start(cfg.kubernetes.refresh_interval()))
    } else {
        None
    };

    let hosted: Vec<&str> = role.plugins().map(PluginId::as_str).collect();
    info!(role = %role, plugins = ?hosted, "Backend ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    if let Some(task) = clusters {
        task.cancel();
        task.join().await.context("cluster refresh task failed")?;
    }
    drop(components);
    Ok(())
}
