//! Seams between the session manager and the backend.

use async_trait::async_trait;
use sms_backend::{
    AuthClient, AuthEvent, AuthSubscription, BackendResult, SessionLookup, SignUpOutcome,
};
use sms_core::{Profile, ProfileUpdate};
use uuid::Uuid;

/// Source of identities and session-change notifications
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn subscribe(&self) -> AuthSubscription;

    async fn current_session(&self) -> BackendResult<SessionLookup>;

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthEvent>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> BackendResult<(SignUpOutcome, Option<AuthEvent>)>;

    async fn sign_out(&self) -> BackendResult<AuthEvent>;
}

#[async_trait]
impl AuthProvider for AuthClient {
    fn subscribe(&self) -> AuthSubscription {
        AuthClient::subscribe(self)
    }

    async fn current_session(&self) -> BackendResult<SessionLookup> {
        AuthClient::current_session(self).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthEvent> {
        self.sign_in_with_password(email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> BackendResult<(SignUpOutcome, Option<AuthEvent>)> {
        AuthClient::sign_up(self, email, password, full_name).await
    }

    async fn sign_out(&self) -> BackendResult<AuthEvent> {
        AuthClient::sign_out(self).await
    }
}

/// Profile rows keyed by identity id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `BackendError::NotFound` when the row does not exist
    async fn fetch(&self, id: Uuid) -> BackendResult<Profile>;

    /// Insert and return the stored row
    async fn insert(&self, profile: &Profile) -> BackendResult<Profile>;

    async fn update(&self, id: Uuid, update: &ProfileUpdate) -> BackendResult<Profile>;
}
