#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod context;
pub mod entity_ref;

pub use context::{RequesterIdentity, RequesterIdentityBuilder};
pub use entity_ref::{EntityRef, EntityRefParseError, NormalizedRefs, normalize_ref};
