//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`PolicyEnforcer`]: build request → evaluate → resolve conditions
//! - [`EnforcerError`]: deny and failure outcomes for `?`-style handlers

pub mod enforcer;

pub use enforcer::{EnforcerError, PolicyEnforcer};
