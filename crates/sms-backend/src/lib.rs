//! Client for the hosted backend-as-a-service.
//!
//! Covers the password auth API, local session persistence, session-change
//! notifications and row-level table queries.

pub mod auth_client;
pub mod auth_event;
pub mod client;
pub mod error;
pub mod query;
pub mod session;
pub mod storage;
pub mod subscription;

#[cfg(test)]
mod tests;

pub use auth_client::AuthClient;
pub use auth_event::{AuthChangeEvent, AuthEvent, SessionLookup};
pub use client::BackendClient;
pub use error::{BackendError, Result as BackendResult};
pub use query::{Database, TableQuery};
pub use session::{AuthUser, Session, SignUpOutcome};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use subscription::AuthSubscription;

/// Refresh a stored session this many seconds before it actually expires
pub const EXPIRY_MARGIN_SECS: i64 = 60;

const AUTH_PATH: &str = "/auth/v1";
const REST_PATH: &str = "/rest/v1";

/// PostgREST code for "single row requested, zero (or many) returned"
const NO_ROWS_CODE: &str = "PGRST116";
