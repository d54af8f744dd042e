use crate::entity_ref::NormalizedRefs;

/// `RequesterIdentity` describes the authenticated caller of an operation.
///
/// Built by the auth layer after sign-in and handed to the permission policy
/// on every authorization request. An unauthenticated request carries no
/// identity at all (`Option<RequesterIdentity>::None`), not an empty one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequesterIdentity {
    /// Primary identifier, e.g. `user:default/alice`.
    user_entity_ref: String,
    /// The user itself plus every group or team it belongs to.
    #[serde(default)]
    ownership_entity_refs: Vec<String>,
}

impl RequesterIdentity {
    /// Create a new `RequesterIdentity` builder
    #[must_use]
    pub fn builder() -> RequesterIdentityBuilder {
        RequesterIdentityBuilder::default()
    }

    /// Primary identifier of the requester.
    #[must_use]
    pub fn user_entity_ref(&self) -> &str {
        &self.user_entity_ref
    }

    /// Ownership entity references as supplied by the auth layer.
    #[must_use]
    pub fn ownership_entity_refs(&self) -> &[String] {
        &self.ownership_entity_refs
    }

    /// Lowercased ownership references, computed once per request.
    #[must_use]
    pub fn normalized_refs(&self) -> NormalizedRefs {
        self.ownership_entity_refs.iter().collect()
    }
}

#[derive(Default)]
pub struct RequesterIdentityBuilder {
    user_entity_ref: Option<String>,
    ownership_entity_refs: Vec<String>,
}

impl RequesterIdentityBuilder {
    #[must_use]
    pub fn user_entity_ref(mut self, user_entity_ref: impl Into<String>) -> Self {
        self.user_entity_ref = Some(user_entity_ref.into());
        self
    }

    #[must_use]
    pub fn ownership_entity_ref(mut self, entity_ref: impl Into<String>) -> Self {
        self.ownership_entity_refs.push(entity_ref.into());
        self
    }

    #[must_use]
    pub fn ownership_entity_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ownership_entity_refs = refs.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the identity. When no ownership references were given, the user
    /// reference alone is used so the requester always owns what it created.
    #[must_use]
    pub fn build(self) -> RequesterIdentity {
        let user_entity_ref = self.user_entity_ref.unwrap_or_default();
        let ownership_entity_refs =
            if self.ownership_entity_refs.is_empty() && !user_entity_ref.is_empty() {
                vec![user_entity_ref.clone()]
            } else {
                self.ownership_entity_refs
            };

        RequesterIdentity {
            user_entity_ref,
            ownership_entity_refs,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_full() {
        let identity = RequesterIdentity::builder()
            .user_entity_ref("user:default/alice")
            .ownership_entity_refs(["user:default/alice", "group:default/team-a"])
            .build();

        assert_eq!(identity.user_entity_ref(), "user:default/alice");
        assert_eq!(
            identity.ownership_entity_refs(),
            &["user:default/alice", "group:default/team-a"]
        );
    }

    #[test]
    fn builder_defaults_ownership_to_user_ref() {
        let identity = RequesterIdentity::builder()
            .user_entity_ref("user:default/bob")
            .build();

        assert_eq!(identity.ownership_entity_refs(), &["user:default/bob"]);
    }

    #[test]
    fn builder_minimal_is_empty() {
        let identity = RequesterIdentity::builder().build();

        assert!(identity.user_entity_ref().is_empty());
        assert!(identity.ownership_entity_refs().is_empty());
        assert!(identity.normalized_refs().is_empty());
    }

    #[test]
    fn builder_appends_single_refs() {
        let identity = RequesterIdentity::builder()
            .user_entity_ref("user:default/carol")
            .ownership_entity_ref("user:default/carol")
            .ownership_entity_ref("Group:Default/Guests")
            .build();

        let refs = identity.normalized_refs();
        assert_eq!(refs.len(), 2);
        assert!(refs.contains("group:default/guests"));
    }

    #[test]
    fn serde_defaults_missing_refs() {
        let identity: RequesterIdentity =
            serde_json::from_str(r#"{"user_entity_ref":"user:default/dave"}"#).unwrap();
        assert_eq!(identity.user_entity_ref(), "user:default/dave");
        assert!(identity.ownership_entity_refs().is_empty());
    }
}
