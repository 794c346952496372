//! Authenticated principal as issued by the auth service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user id plus email. Only sign-in, sign-up and sign-out change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: String,
}

impl Identity {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}
