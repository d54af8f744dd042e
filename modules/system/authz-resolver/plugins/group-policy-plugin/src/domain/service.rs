//! Service implementation for the group permission policy.

use std::fmt;

use authz_resolver_sdk::{
    AuthorizationRequest, CATALOG_ENTITY_RESOURCE_TYPE, ConditionalDecision, PermissionCondition,
    PolicyDecision,
};
use portal_security::RequesterIdentity;
use tracing::{debug, warn};

use super::policy::CompiledPolicy;

/// The rule that produced a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRule {
    Unauthenticated,
    Guest,
    GroupGrant { group: String, pattern: String },
    CatalogEntityRead,
    CatalogEntityOwnership,
    Creation,
    AlwaysAllowPrefix(String),
    AuthenticatedBase,
    DefaultDeny,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("unauthenticated"),
            Self::Guest => f.write_str("guest"),
            Self::GroupGrant { group, pattern } => write!(f, "group:{group}:{pattern}"),
            Self::CatalogEntityRead => f.write_str("catalog_entity_read"),
            Self::CatalogEntityOwnership => f.write_str("catalog_entity_ownership"),
            Self::Creation => f.write_str("creation"),
            Self::AlwaysAllowPrefix(prefix) => write!(f, "prefix:{prefix}"),
            Self::AuthenticatedBase => f.write_str("authenticated_base"),
            Self::DefaultDeny => f.write_str("default_deny"),
        }
    }
}

/// A decision together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: PolicyDecision,
    pub rule: MatchedRule,
}

impl Evaluation {
    fn allow_if(allowed: bool, rule: MatchedRule) -> Self {
        let decision = if allowed {
            PolicyDecision::Allow
        } else {
            PolicyDecision::Deny
        };
        Self { decision, rule }
    }

    fn allow(rule: MatchedRule) -> Self {
        Self::allow_if(true, rule)
    }
}

/// Group permission policy service.
///
/// Holds only the compiled policy; evaluation never mutates it, so one
/// instance serves every concurrent request.
#[derive(Debug)]
pub struct Service {
    policy: CompiledPolicy,
}

impl Service {
    #[must_use]
    pub fn new(policy: CompiledPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &CompiledPolicy {
        &self.policy
    }

    /// Decide a request and log the outcome.
    #[must_use]
    pub fn evaluate(&self, request: &AuthorizationRequest) -> PolicyDecision {
        let evaluation = self.decide(request);
        let permission = request.permission.name.as_str();
        let user = request
            .requester
            .as_ref()
            .map_or("<unauthenticated>", RequesterIdentity::user_entity_ref);
        let refs = request
            .requester
            .as_ref()
            .map(RequesterIdentity::ownership_entity_refs)
            .unwrap_or_default();

        if evaluation.rule == MatchedRule::DefaultDeny {
            warn!(
                permission,
                user_entity_ref = user,
                ownership_refs = ?refs,
                "Permission not explicitly allowed; consider adding it to the policy configuration"
            );
        }
        debug!(
            permission,
            user_entity_ref = user,
            ownership_refs = ?refs,
            decision = %evaluation.decision,
            rule = %evaluation.rule,
            "Permission decision"
        );

        evaluation.decision
    }

    /// Walk the rule list; the first matching rule decides.
    #[must_use]
    pub fn decide(&self, request: &AuthorizationRequest) -> Evaluation {
        let permission = &request.permission;
        let name = permission.name.as_str();

        let Some(requester) = &request.requester else {
            return Evaluation::allow_if(
                self.policy.unauthenticated.allows_read(name),
                MatchedRule::Unauthenticated,
            );
        };

        let refs = requester.normalized_refs();

        if self.policy.guest_group.intersects(&refs) {
            return Evaluation::allow_if(self.policy.guest.allows_read(name), MatchedRule::Guest);
        }

        if let Some((group, pattern)) = self
            .policy
            .groups
            .iter()
            .filter(|g| g.members.intersects(&refs))
            .find_map(|g| g.grants.matching(name).map(|p| (g, p)))
        {
            return Evaluation::allow(MatchedRule::GroupGrant {
                group: group.name.clone(),
                pattern: pattern.as_str().to_owned(),
            });
        }

        if permission.resource_type() == Some(CATALOG_ENTITY_RESOURCE_TYPE) {
            if self.policy.authenticated_base.allows_read(name) {
                return Evaluation::allow(MatchedRule::CatalogEntityRead);
            }
            let condition = PermissionCondition::IsEntityOwner {
                claims: requester.ownership_entity_refs().to_vec(),
            };
            return Evaluation {
                decision: PolicyDecision::Conditional(ConditionalDecision::catalog_entity(
                    condition,
                )),
                rule: MatchedRule::CatalogEntityOwnership,
            };
        }

        if self.policy.creation.contains(name) {
            return Evaluation::allow(MatchedRule::Creation);
        }

        if let Some(prefix) = self
            .policy
            .always_allow_prefixes
            .iter()
            .find(|p| name.starts_with(p.as_str()))
        {
            return Evaluation::allow(MatchedRule::AlwaysAllowPrefix(prefix.clone()));
        }

        if self.policy.authenticated_base.allows_read(name) {
            return Evaluation::allow(MatchedRule::AuthenticatedBase);
        }

        Evaluation::allow_if(false, MatchedRule::DefaultDeny)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::PermissionPolicyConfig;
    use authz_resolver_sdk::{AuthorizeResult, CatalogEntity, Permission};
    use tracing_test::traced_test;

    fn service() -> Service {
        Service::new(CompiledPolicy::compile(&PermissionPolicyConfig::default()).unwrap())
    }

    fn user(name: &str, groups: &[&str]) -> RequesterIdentity {
        let user_ref = format!("user:default/{name}");
        RequesterIdentity::builder()
            .user_entity_ref(user_ref.clone())
            .ownership_entity_refs(
                std::iter::once(user_ref).chain(groups.iter().map(|g| format!("group:default/{g}"))),
            )
            .build()
    }

    fn entity(name: &str) -> Permission {
        Permission::resource(name, CATALOG_ENTITY_RESOURCE_TYPE)
    }

    fn decide(svc: &Service, permission: Permission, requester: Option<RequesterIdentity>) -> Evaluation {
        svc.decide(&AuthorizationRequest::new(permission, requester))
    }

    #[test]
    fn unauthenticated_may_only_read() {
        let svc = service();
        let read = decide(&svc, entity("catalog.entity.read"), None);
        assert_eq!(read.decision, PolicyDecision::Allow);
        assert_eq!(read.rule, MatchedRule::Unauthenticated);

        let delete = decide(&svc, entity("catalog.entity.delete"), None);
        assert_eq!(delete.decision, PolicyDecision::Deny);

        let create = decide(&svc, Permission::basic("catalog.entity.create"), None);
        assert_eq!(create.decision, PolicyDecision::Deny);
    }

    #[test]
    fn guests_short_circuit_everything_else() {
        let svc = service();
        let guest_in_conselho = user("guest", &["guests", "conselho"]);

        let task = decide(
            &svc,
            Permission::basic("scaffolder.task.create"),
            Some(guest_in_conselho.clone()),
        );
        assert_eq!(task.decision, PolicyDecision::Deny);
        assert_eq!(task.rule, MatchedRule::Guest);

        let announce = decide(
            &svc,
            Permission::basic("announcement.entity.create"),
            Some(guest_in_conselho.clone()),
        );
        assert_eq!(announce.decision, PolicyDecision::Deny);

        let read = decide(&svc, entity("catalog.entity.read"), Some(guest_in_conselho));
        assert_eq!(read.decision, PolicyDecision::Allow);
        assert_eq!(read.rule, MatchedRule::Guest);
    }

    #[test]
    fn guest_user_reference_alone_marks_a_guest() {
        let svc = service();
        let guest = RequesterIdentity::builder()
            .user_entity_ref("user:default/guest")
            .build();
        let exec = decide(&svc, Permission::basic("scaffolder.action.execute"), Some(guest));
        assert_eq!(exec.decision, PolicyDecision::Deny);
        assert_eq!(exec.rule, MatchedRule::Guest);
    }

    #[test]
    fn guest_membership_ignores_case() {
        let svc = service();
        let shouty = RequesterIdentity::builder()
            .user_entity_ref("user:default/visitor")
            .ownership_entity_refs(["user:default/visitor", "Group:Default/GUESTS"])
            .build();
        let eval = decide(&svc, Permission::basic("catalog.entity.create"), Some(shouty));
        assert_eq!(eval.rule, MatchedRule::Guest);
        assert_eq!(eval.decision, PolicyDecision::Deny);
    }

    #[test]
    fn conselho_manages_announcements() {
        let svc = service();
        let eval = decide(
            &svc,
            Permission::basic("announcement.entity.create"),
            Some(user("ana", &["conselho"])),
        );
        assert_eq!(eval.decision, PolicyDecision::Allow);
        assert_eq!(
            eval.rule,
            MatchedRule::GroupGrant {
                group: "conselho".to_owned(),
                pattern: "announcement.entity.*".to_owned()
            }
        );
    }

    #[test]
    fn non_members_do_not_get_group_grants() {
        let svc = service();
        let eval = decide(
            &svc,
            Permission::basic("announcement.entity.create"),
            Some(user("bob", &["team-a"])),
        );
        assert_eq!(eval.decision, PolicyDecision::Deny);
        assert_eq!(eval.rule, MatchedRule::DefaultDeny);
    }

    #[test]
    fn catalog_entity_writes_are_conditional_on_ownership() {
        let svc = service();
        let bob = user("bob", &["team-a"]);
        let eval = decide(&svc, entity("catalog.entity.update"), Some(bob));
        assert_eq!(eval.rule, MatchedRule::CatalogEntityOwnership);

        let PolicyDecision::Conditional(conditional) = eval.decision else {
            panic!("expected a conditional decision");
        };
        assert_eq!(conditional.plugin_id, "catalog");
        assert_eq!(
            conditional.condition,
            PermissionCondition::IsEntityOwner {
                claims: vec![
                    "user:default/bob".to_owned(),
                    "group:default/team-a".to_owned()
                ]
            }
        );

        let foreign = CatalogEntity::new("component:default/billing", ["group:default/team-b"]);
        let owned = CatalogEntity::new("component:default/payments", ["group:default/team-a"]);
        assert_eq!(conditional.apply(&foreign), AuthorizeResult::Deny);
        assert_eq!(conditional.apply(&owned), AuthorizeResult::Allow);
    }

    #[test]
    fn catalog_entity_reads_are_allowed() {
        let svc = service();
        let eval = decide(&svc, entity("catalog.entity.read"), Some(user("bob", &[])));
        assert_eq!(eval.decision, PolicyDecision::Allow);
        assert_eq!(eval.rule, MatchedRule::CatalogEntityRead);
    }

    #[test]
    fn creation_and_scaffolder_are_allowed() {
        let svc = service();
        let bob = Some(user("bob", &[]));

        let create = decide(&svc, Permission::basic("catalog.location.create"), bob.clone());
        assert_eq!(create.decision, PolicyDecision::Allow);
        assert_eq!(create.rule, MatchedRule::Creation);

        let exec = decide(&svc, Permission::basic("scaffolder.action.execute"), bob);
        assert_eq!(exec.decision, PolicyDecision::Allow);
        assert_eq!(exec.rule, MatchedRule::AlwaysAllowPrefix("scaffolder.".to_owned()));
    }

    #[test]
    fn basic_reads_use_authenticated_base() {
        let svc = service();
        let eval = decide(&svc, Permission::basic("techdocs.entity.read"), Some(user("bob", &[])));
        assert_eq!(eval.decision, PolicyDecision::Allow);
        assert_eq!(eval.rule, MatchedRule::AuthenticatedBase);
    }

    #[test]
    fn decisions_are_idempotent() {
        let svc = service();
        let request = AuthorizationRequest::new(
            entity("catalog.entity.delete"),
            Some(user("bob", &["team-a"])),
        );
        assert_eq!(svc.decide(&request), svc.decide(&request));
        assert_eq!(svc.evaluate(&request), svc.evaluate(&request));
    }

    #[test]
    #[traced_test]
    fn unknown_permissions_are_denied_with_a_warning() {
        let svc = service();
        let request =
            AuthorizationRequest::new(Permission::basic("kubernetes.proxy"), Some(user("bob", &[])));
        assert_eq!(svc.evaluate(&request), PolicyDecision::Deny);
        assert!(logs_contain("Permission not explicitly allowed"));
        assert!(logs_contain("kubernetes.proxy"));
    }

    #[test]
    #[traced_test]
    fn allow_decisions_are_logged_too() {
        let svc = service();
        let request = AuthorizationRequest::unauthenticated(entity("catalog.entity.read"));
        assert_eq!(svc.evaluate(&request), PolicyDecision::Allow);
        assert!(logs_contain("Permission decision"));
        assert!(logs_contain("rule=unauthenticated"));
        assert!(!logs_contain("Permission not explicitly allowed"));
    }
}
