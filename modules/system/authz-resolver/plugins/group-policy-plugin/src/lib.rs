#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Group Permission Policy Plugin
//!
//! Decides authorization requests from requester group membership and
//! catalog entity ownership.
//!
//! ## Rules (first match wins)
//!
//! 1. No identity → read permissions only
//! 2. Guest group member → read permissions only
//! 3. Special group member with a matching grant → allow
//! 4. `catalog-entity` resource → reads allowed, otherwise conditional on ownership
//! 5. Catalog entity/location creation → allow
//! 6. Always-allowed prefix (`scaffolder.`) → allow
//! 7. Authenticated base permissions → allow
//! 8. Anything else → deny, logged as a warning
//!
//! ## Configuration
//!
//! ```yaml
//! permission:
//!   special_groups:
//!     conselho: ["group:default/conselho"]
//!   group_permissions:
//!     conselho: ["announcement.entity.*"]
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::PermissionPolicyConfig;
pub use domain::{CompiledPolicy, Evaluation, MatchedRule, PolicyConfigError, PolicySummary, Service};
pub use module::GroupPolicyPlugin;
