use super::fakes::profile_row;
use crate::{GuardDecision, RouteGuard, SessionPhase, SessionSnapshot};

use std::time::Duration;

use proptest::prelude::*;
use sms_core::{Identity, Role};
use uuid::Uuid;

fn phase() -> impl Strategy<Value = SessionPhase> {
    prop_oneof![
        Just(SessionPhase::Initializing),
        Just(SessionPhase::SignedOut),
        Just(SessionPhase::LoadingProfile),
        Just(SessionPhase::Ready),
    ]
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::Staff), Just(Role::User)]
}

prop_compose! {
    fn snapshot()(
        phase in phase(),
        id in any::<u128>(),
        signed_in in any::<bool>(),
        profile_role in proptest::option::of(proptest::option::of(role())),
        generation in any::<u64>(),
    ) -> SessionSnapshot {
        let id = Uuid::from_u128(id);
        SessionSnapshot {
            identity: signed_in.then(|| Identity::new(id, "p@x.com")),
            profile: profile_role.map(|role| profile_row(id, "p@x.com", role)),
            phase,
            generation,
        }
    }
}

fn guard() -> RouteGuard {
    RouteGuard::new("/login", "/unauthorized", Duration::from_millis(10))
}

proptest! {
    #[test]
    fn given_loading_snapshot_when_evaluated_then_never_renders(
        snapshot in snapshot(),
        roles in proptest::option::of(proptest::collection::vec(role(), 1..3)),
        path in "/[a-z]{0,12}",
    ) {
        let decision = guard().evaluate(&snapshot, &path, roles.as_deref());

        if snapshot.loading() {
            prop_assert_eq!(decision, GuardDecision::Loading);
        }
    }

    #[test]
    fn given_settled_without_identity_then_login_preserving_path(
        snapshot in snapshot(),
        roles in proptest::option::of(proptest::collection::vec(role(), 1..3)),
        path in "/[a-z]{0,12}",
    ) {
        prop_assume!(!snapshot.loading() && snapshot.identity.is_none());

        let decision = guard().evaluate(&snapshot, &path, roles.as_deref());

        prop_assert_eq!(decision, GuardDecision::RedirectToLogin {
            login_path: String::from("/login"),
            return_to: path,
        });
    }

    #[test]
    fn given_render_decision_then_role_requirement_met(
        snapshot in snapshot(),
        roles in proptest::option::of(proptest::collection::vec(role(), 1..3)),
    ) {
        let decision = guard().evaluate(&snapshot, "/view", roles.as_deref());

        if decision.is_render() {
            prop_assert!(!snapshot.loading());
            prop_assert!(snapshot.identity.is_some());
            if let Some(roles) = &roles {
                let role = snapshot.profile.as_ref().and_then(|p| p.role);
                prop_assert!(role.is_some_and(|r| roles.contains(&r)));
            }
        }
    }

    #[test]
    fn given_signed_in_with_role_outside_list_then_unauthorized_not_login(
        snapshot in snapshot(),
        role in role(),
    ) {
        prop_assume!(!snapshot.loading() && snapshot.identity.is_some());
        let allowed: Vec<Role> = Role::ALL.iter().copied().filter(|r| *r != role).collect();
        let mut snapshot = snapshot;
        if let Some(profile) = snapshot.profile.as_mut() {
            profile.role = Some(role);
        } else {
            return Ok(());
        }

        let decision = guard().evaluate(&snapshot, "/students", Some(allowed.as_slice()));

        prop_assert_eq!(decision, GuardDecision::RedirectToUnauthorized {
            path: String::from("/unauthorized"),
        });
    }
}
