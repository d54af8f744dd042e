//! Domain layer for the discovery resolver.

pub mod local_client;
pub mod routes;
pub mod service;

pub use local_client::DiscoveryLocalClient;
pub use routes::{PluginRoute, RouteTable};
pub use service::Service;
