#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Discovery Resolver SDK
//!
//! This crate provides the public API for the `discovery_resolver` module:
//!
//! - [`DiscoveryClient`] - Public API trait for consumers
//! - [`PluginId`], [`BackendGroup`] - Plugin routing model
//! - [`DiscoveryError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use discovery_resolver_sdk::DiscoveryClient;
//!
//! // Backend-to-backend call
//! let url = discovery.resolve_internal("catalog").await?;
//!
//! // Browser-visible callback
//! let callback = discovery.resolve_external("auth").await?;
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::DiscoveryClient;
pub use error::DiscoveryError;
pub use models::{BackendGroup, PluginId};
