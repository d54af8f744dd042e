#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Resolution properties exercised through the public `DiscoveryClient` seam.

use std::sync::Arc;

use discovery_resolver::{DiscoveryResolver, DiscoveryResolverConfig};
use discovery_resolver_sdk::{DiscoveryClient, DiscoveryError, PluginId};

const EXTERNAL: &str = "https://portal.example.com";

fn client() -> Arc<dyn DiscoveryClient> {
    let cfg = DiscoveryResolverConfig {
        catalog_service_url: "http://backend-catalog:7008".to_owned(),
        techdocs_service_url: "http://backend-techdocs:7009".to_owned(),
        main_service_url: "http://backend-main:7007".to_owned(),
        external_base_url: Some(EXTERNAL.to_owned()),
    };
    DiscoveryResolver::init(&cfg).unwrap().client()
}

#[tokio::test]
async fn unknown_plugins_fail_with_descriptive_error() {
    let client = client();

    for plugin_id in ["", "billing", "Catalog", "catalog/", "api"] {
        for err in [
            client.resolve_internal(plugin_id).await.unwrap_err(),
            client.resolve_external(plugin_id).await.unwrap_err(),
        ] {
            let DiscoveryError::UnknownPlugin {
                plugin_id: reported,
                available,
            } = &err
            else {
                panic!("expected UnknownPlugin, got {err:?}");
            };
            assert_eq!(reported, plugin_id);
            assert_eq!(available, &PluginId::known_ids());
            assert!(err.to_string().contains("Available plugins: catalog, techdocs"));
        }
    }
}

#[tokio::test]
async fn browser_facing_plugins_resolve_to_external_api_path() {
    let client = client();

    for plugin in PluginId::ALL.into_iter().filter(|p| p.is_browser_facing()) {
        let url = client.resolve_external(plugin.as_str()).await.unwrap();
        assert_eq!(url.as_str(), format!("{EXTERNAL}/api/{plugin}"));
    }
}

#[tokio::test]
async fn other_plugins_resolve_externally_to_internal_url() {
    let client = client();

    for plugin in PluginId::ALL.into_iter().filter(|p| !p.is_browser_facing()) {
        let external = client.resolve_external(plugin.as_str()).await.unwrap();
        let internal = client.resolve_internal(plugin.as_str()).await.unwrap();
        assert_eq!(external, internal);
    }
}

#[tokio::test]
async fn internal_urls_follow_the_hosting_backend() {
    let client = client();

    assert_eq!(
        client.resolve_internal("catalog").await.unwrap().as_str(),
        "http://backend-catalog:7008/api/catalog"
    );
    assert_eq!(
        client.resolve_internal("techdocs").await.unwrap().as_str(),
        "http://backend-techdocs:7009/api/techdocs"
    );
    for plugin in ["auth", "proxy", "permission", "scaffolder", "announcements", "adr"] {
        assert_eq!(
            client.resolve_internal(plugin).await.unwrap().as_str(),
            format!("http://backend-main:7007/api/{plugin}")
        );
    }
}

#[test]
fn invalid_configuration_fails_startup() {
    let cfg = DiscoveryResolverConfig {
        main_service_url: "backend-main".to_owned(),
        ..DiscoveryResolverConfig::default()
    };
    let err = DiscoveryResolver::init(&cfg).unwrap_err();
    assert!(matches!(err, DiscoveryError::InvalidUrl { .. }));
}
