use thiserror::Error;

/// Policy configuration rejected at load time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyConfigError {
    #[error("special group '{group}' has no permission set in group_permissions")]
    MissingPermissionSet { group: String },

    #[error("group_permissions entry '{group}' does not name a declared special group")]
    UndeclaredGroup { group: String },

    #[error("special group '{group}' has no member references")]
    EmptyGroup { group: String },

    #[error("guest_group must contain at least one entity reference")]
    EmptyGuestGroup,

    #[error("invalid entity reference '{entity_ref}' in {field}: {reason}")]
    InvalidEntityRef {
        field: String,
        entity_ref: String,
        reason: String,
    },

    #[error("invalid permission pattern '{pattern}' in {field}: {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },
}
