use crate::ProfileStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sms_backend::{BackendResult, Database};
use sms_core::{Profile, ProfileUpdate, Role};
use uuid::Uuid;

/// Columns written on insert. A missing role is left to the table default.
#[derive(Serialize)]
struct NewProfileRow<'a> {
    id: Uuid,
    email: &'a str,
    full_name: Option<&'a str>,
    avatar_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a Profile> for NewProfileRow<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            id: profile.id,
            email: &profile.email,
            full_name: profile.full_name.as_deref(),
            avatar_url: profile.avatar_url.as_deref(),
            role: profile.role,
            created_at: profile.created_at,
        }
    }
}

/// [`ProfileStore`] over a backend table
#[derive(Clone)]
pub struct ProfileRepository {
    db: Database,
    table: String,
}

impl ProfileRepository {
    pub fn new(db: Database, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn fetch(&self, id: Uuid) -> BackendResult<Profile> {
        self.db
            .from(&self.table)
            .select("*")
            .eq("id", id)
            .single()
            .execute()
            .await
    }

    async fn insert(&self, profile: &Profile) -> BackendResult<Profile> {
        self.db
            .from(&self.table)
            .insert(&NewProfileRow::from(profile))?
            .single()
            .execute()
            .await
    }

    async fn update(&self, id: Uuid, update: &ProfileUpdate) -> BackendResult<Profile> {
        self.db
            .from(&self.table)
            .update(update)?
            .eq("id", id)
            .single()
            .execute()
            .await
    }
}
