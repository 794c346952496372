use crate::Session;

use serde::Serialize;

/// Why the session changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// Session-change notification.
///
/// `generation` increases by one with every change the auth client makes,
/// so observers can order notifications against lookups.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub kind: AuthChangeEvent,
    pub session: Option<Session>,
    pub generation: u64,
}

/// Result of a session lookup, stamped with the generation it reflects
#[derive(Debug, Clone)]
pub struct SessionLookup {
    pub session: Option<Session>,
    pub generation: u64,
}
