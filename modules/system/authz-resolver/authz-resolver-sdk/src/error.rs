//! Error types for the permission policy API.

use thiserror::Error;

/// Errors that can occur when asking the permission policy for a decision.
///
/// The policy is compiled before any client exists, so the only failure
/// left is an implementation fault behind the client.
/// Access denial is expressed via [`crate::PolicyDecision::Deny`],
/// not as an error variant.
#[derive(Debug, Error)]
pub enum AuthZResolverError {
    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
