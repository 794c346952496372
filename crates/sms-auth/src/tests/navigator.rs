use super::fakes::{profile_row, user_id};
use crate::{
    GuardDecision, Navigator, RouteGuard, RouteOutcome, RouteTable, SessionHandle, SessionPhase,
    SessionSnapshot,
};

use std::time::Duration;

use sms_core::{Identity, Role};
use tokio::sync::watch;

fn navigator() -> Navigator {
    let table = RouteTable::default();
    let guard = RouteGuard::new(
        table.login_path(),
        table.unauthorized_path(),
        Duration::from_millis(50),
    );
    Navigator::new(table, guard)
}

fn ready_as(role: Role) -> SessionSnapshot {
    let id = user_id(9);
    SessionSnapshot {
        identity: Some(Identity::new(id, "a@x.com")),
        profile: Some(profile_row(id, "a@x.com", Some(role))),
        phase: SessionPhase::Ready,
        generation: 2,
    }
}

#[test]
fn given_public_path_then_renders_without_guard_even_while_loading() {
    let outcome = navigator().evaluate(&SessionSnapshot::initializing(), "/login");

    assert_eq!(
        outcome,
        RouteOutcome::Public {
            path: String::from("/login")
        }
    );
}

#[test]
fn given_unknown_path_then_not_found() {
    let outcome = navigator().evaluate(&ready_as(Role::Admin), "/payments");

    assert!(matches!(outcome, RouteOutcome::NotFound { ref path } if path == "/payments"));
}

#[test]
fn given_gated_path_then_guard_decides_with_view_roles() {
    let nav = navigator();

    match nav.evaluate(&ready_as(Role::Staff), "/settings") {
        RouteOutcome::Guarded { view, decision } => {
            assert_eq!(view.title, "Settings");
            assert_eq!(decision.redirect_target(), Some("/unauthorized"));
        }
        other => panic!("expected guarded outcome, got {other:?}"),
    }

    match nav.evaluate(&ready_as(Role::Staff), "/students") {
        RouteOutcome::Guarded { decision, .. } => assert!(decision.is_render()),
        other => panic!("expected guarded outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn given_signed_out_when_navigate_then_login_with_return_path() {
    let (_tx, rx) = watch::channel(SessionSnapshot::signed_out(1));
    let handle = SessionHandle::new(rx);

    let outcome = navigator().navigate(&handle, "/appointments").await;

    match outcome {
        RouteOutcome::Guarded { decision, .. } => assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                login_path: String::from("/login"),
                return_to: String::from("/appointments"),
            }
        ),
        other => panic!("expected guarded outcome, got {other:?}"),
    }
}
