//! Discovery Resolver Module
//!
//! Builds the immutable plugin route table at startup and resolves plugin ids
//! to internal (service-to-service) and external (browser-facing) base URLs.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::DiscoveryResolverConfig;
pub use domain::{DiscoveryLocalClient, PluginRoute, RouteTable, Service};
pub use module::DiscoveryResolver;
