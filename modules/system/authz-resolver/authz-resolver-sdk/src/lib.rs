#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Permission policy SDK
//!
//! This crate provides the public API of the portal permission policy:
//!
//! - [`PermissionPolicyClient`] - Public API trait for consumers
//! - [`Permission`], [`AuthorizationRequest`] - Request models
//! - [`PolicyDecision`], [`ConditionalDecision`] - Decision models
//! - [`AuthZResolverError`] - Error types
//! - [`pep`] - PEP helpers ([`PolicyEnforcer`])
//!
//! ## Usage
//!
//! ```ignore
//! use authz_resolver_sdk::{CatalogEntity, Permission, pep::PolicyEnforcer};
//!
//! // Create an enforcer (once, during init)
//! let enforcer = PolicyEnforcer::new(policy_client);
//!
//! // Reads and creations resolve without a resource
//! enforcer.enforce(requester.as_ref(), &Permission::basic("catalog.entity.create"), None).await?;
//!
//! // Updates and deletes are conditional on ownership of the entity
//! let update = Permission::resource("catalog.entity.update", "catalog-entity");
//! enforcer.enforce(requester.as_ref(), &update, Some(&entity)).await?;
//! ```

pub mod api;
pub mod conditions;
pub mod error;
pub mod models;
pub mod pep;

// Re-export main types at crate root
pub use api::PermissionPolicyClient;
pub use conditions::{
    CATALOG_ENTITY_RESOURCE_TYPE, CATALOG_PLUGIN_ID, CatalogEntity, ConditionalDecision,
    PermissionCondition,
};
pub use error::AuthZResolverError;
pub use models::{
    AuthorizationRequest, AuthorizeResult, Permission, PermissionAction, PermissionAttributes,
    PermissionKind, PolicyDecision,
};
pub use pep::{EnforcerError, PolicyEnforcer};
pub use portal_security::RequesterIdentity;
