//! Wire types of the auth API.

use crate::BackendResult;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sms_core::Identity;
use uuid::Uuid;

const DEFAULT_EXPIRES_IN: i64 = 3600;

/// User object returned by the auth API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.email.clone().unwrap_or_default())
    }

    /// Name given at sign-up, kept in the user metadata
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Access/refresh token pair plus the user it was issued to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    /// Unix seconds; filled from `expires_in` when the server omits it
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    String::from("bearer")
}

fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN
}

impl Session {
    /// Pin `expires_at` relative to `now` when the server sent only `expires_in`
    pub fn with_expiry_from(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now.saturating_add(self.expires_in));
        }
        self
    }

    pub fn is_expired(&self, now: i64, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(at) => now.saturating_add(margin_secs) >= at,
            None => false,
        }
    }

    pub fn identity(&self) -> Identity {
        self.user.identity()
    }
}

/// Result of a sign-up: the account always, a session only when the
/// project does not require email confirmation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<Session>,
}

impl SignUpOutcome {
    pub(crate) fn from_body(body: Value, now: i64) -> BackendResult<Self> {
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)?;
            let session = session.with_expiry_from(now);
            return Ok(Self {
                user: session.user.clone(),
                session: Some(session),
            });
        }

        let user_value = match body.get("user") {
            Some(user) if user.is_object() => user.clone(),
            _ => body,
        };
        let user: AuthUser = serde_json::from_value(user_value)?;

        Ok(Self {
            user,
            session: None,
        })
    }
}
