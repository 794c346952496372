//! Application-owned metadata for an identity.

use crate::{Identity, Role};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the profile table, keyed by the identity id.
///
/// `role` is `None` for a default profile that was never assigned an
/// access level. Such a profile passes no role-gated view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Minimal profile used when the stored row is missing or unreadable
    pub fn fallback(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            full_name: None,
            avatar_url: None,
            role: None,
            created_at: Utc::now(),
        }
    }

    /// Profile row written right after sign-up
    pub fn for_new_account(identity: &Identity, full_name: &str) -> Self {
        let full_name = full_name.trim();
        Self {
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
            ..Self::fallback(identity)
        }
    }

    pub fn has_role_in(&self, allowed: &[Role]) -> bool {
        self.role.is_some_and(|role| allowed.contains(&role))
    }

    /// Name to show in headers: full name, else the email
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }
}
