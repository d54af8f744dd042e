//! Error types for the discovery resolver module.

use thiserror::Error;

/// Discovery configuration errors.
///
/// Both variants are fatal for the operation that triggered them: an unknown
/// plugin is never routed to a default backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The plugin id is not part of the route table.
    #[error(
        "no service URL configured for plugin: {plugin_id}. Available plugins: {}",
        .available.join(", ")
    )]
    UnknownPlugin {
        plugin_id: String,
        available: Vec<String>,
    },

    /// A configured base URL could not be parsed.
    #[error("invalid URL for {key}: '{url}': {reason}")]
    InvalidUrl {
        key: String,
        url: String,
        reason: String,
    },
}
