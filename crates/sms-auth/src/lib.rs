//! Session lifecycle and route protection.
//!
//! [`SessionManager`] keeps one [`SessionSnapshot`] in sync with the auth
//! service and the profile table. [`RouteGuard`] and [`Navigator`] read
//! snapshots to decide what a navigation may show.

pub mod error;
pub mod guard_decision;
pub mod navigator;
pub mod profile_repository;
pub mod provider;
pub mod route_guard;
pub mod route_table;
pub mod session_handle;
pub mod session_manager;
pub mod session_settings;
pub mod session_snapshot;

pub use error::{AuthError, Result};
pub use guard_decision::GuardDecision;
pub use navigator::{Navigator, RouteOutcome};
pub use profile_repository::ProfileRepository;
pub use provider::{AuthProvider, ProfileStore};
pub use route_guard::RouteGuard;
pub use route_table::{RouteTable, RouteView};
pub use session_handle::SessionHandle;
pub use session_manager::SessionManager;
pub use session_settings::SessionSettings;
pub use session_snapshot::{SessionPhase, SessionSnapshot};

#[cfg(test)]
mod tests;
