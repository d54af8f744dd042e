//! Domain layer for the group permission policy plugin.

mod client;
pub mod error;
pub mod matcher;
pub mod policy;
pub mod service;

pub use error::PolicyConfigError;
pub use matcher::{PermissionPattern, PermissionSet};
pub use policy::{CompiledPolicy, GroupSummary, PolicySummary};
pub use service::{Evaluation, MatchedRule, Service};
