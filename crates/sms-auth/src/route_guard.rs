use crate::{GuardDecision, SessionHandle, SessionSnapshot};

use std::time::Duration;

use log::{debug, warn};
use sms_config::Config;
use sms_core::Role;
use tokio::time::timeout;

/// Decides whether a view may render for a session snapshot
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    unauthorized_path: String,
    wait_limit: Duration,
}

impl RouteGuard {
    pub fn new(
        login_path: impl Into<String>,
        unauthorized_path: impl Into<String>,
        wait_limit: Duration,
    ) -> Self {
        Self {
            login_path: login_path.into(),
            unauthorized_path: unauthorized_path.into(),
            wait_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.routes.login_path.clone(),
            config.routes.unauthorized_path.clone(),
            config.session.guard_timeout(),
        )
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn unauthorized_path(&self) -> &str {
        &self.unauthorized_path
    }

    /// Pure decision for one snapshot.
    ///
    /// Loading always wins: nothing gated renders and nothing redirects
    /// until the session has settled. With a role list, a missing profile
    /// also counts as loading.
    pub fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        requested_path: &str,
        allowed_roles: Option<&[Role]>,
    ) -> GuardDecision {
        if snapshot.loading() {
            return GuardDecision::Loading;
        }

        if snapshot.identity.is_none() {
            return self.redirect_to_login(requested_path);
        }

        let Some(allowed) = allowed_roles else {
            return GuardDecision::Render;
        };

        match &snapshot.profile {
            None => GuardDecision::Loading,
            Some(profile) if profile.has_role_in(allowed) => GuardDecision::Render,
            Some(_) => self.redirect_to_unauthorized(),
        }
    }

    /// Wait (bounded) for a decisive snapshot, then decide.
    ///
    /// Still loading at the deadline: a known identity is denied, an
    /// unknown one is sent to login.
    pub async fn resolve(
        &self,
        handle: &SessionHandle,
        requested_path: &str,
        allowed_roles: Option<&[Role]>,
    ) -> GuardDecision {
        let mut handle = handle.clone();
        let decisive = handle.wait_for(|snapshot| {
            !self
                .evaluate(snapshot, requested_path, allowed_roles)
                .is_loading()
        });

        let snapshot = match timeout(self.wait_limit, decisive).await {
            Ok(Ok(snapshot)) => {
                return self.evaluate(&snapshot, requested_path, allowed_roles);
            }
            Ok(Err(e)) => {
                debug!("Session no longer updating while guarding {requested_path}: {e}");
                handle.snapshot()
            }
            Err(_) => {
                warn!(
                    "Session still loading after {:?} for {requested_path}",
                    self.wait_limit
                );
                handle.snapshot()
            }
        };

        match self.evaluate(&snapshot, requested_path, allowed_roles) {
            GuardDecision::Loading if snapshot.identity.is_some() => {
                self.redirect_to_unauthorized()
            }
            GuardDecision::Loading => self.redirect_to_login(requested_path),
            decision => decision,
        }
    }

    fn redirect_to_login(&self, requested_path: &str) -> GuardDecision {
        GuardDecision::RedirectToLogin {
            login_path: self.login_path.clone(),
            return_to: requested_path.to_string(),
        }
    }

    fn redirect_to_unauthorized(&self) -> GuardDecision {
        GuardDecision::RedirectToUnauthorized {
            path: self.unauthorized_path.clone(),
        }
    }
}
