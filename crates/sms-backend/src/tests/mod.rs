mod query;

use crate::{AuthUser, Session};

use serde_json::json;
use uuid::Uuid;

pub(crate) fn sample_session(expires_at: Option<i64>) -> Session {
    Session {
        access_token: String::from("access-token"),
        refresh_token: String::from("refresh-token"),
        token_type: String::from("bearer"),
        expires_in: 3600,
        expires_at,
        user: AuthUser {
            id: Uuid::parse_str("00000000-0000-0000-0000-00000000000a").unwrap(),
            email: Some(String::from("a@x.com")),
            user_metadata: json!({ "full_name": "Ada" }),
        },
    }
}
