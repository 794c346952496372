use serde::Serialize;
use sms_core::{Identity, Profile};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Initial lookup has not answered yet
    Initializing,
    SignedOut,
    /// Identity known, profile resolution in flight
    LoadingProfile,
    Ready,
}

/// What every consumer sees of the session at one instant.
///
/// `generation` is the auth change the snapshot reflects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub phase: SessionPhase,
    pub generation: u64,
}

impl SessionSnapshot {
    pub fn initializing() -> Self {
        Self {
            identity: None,
            profile: None,
            phase: SessionPhase::Initializing,
            generation: 0,
        }
    }

    pub fn signed_out(generation: u64) -> Self {
        Self {
            identity: None,
            profile: None,
            phase: SessionPhase::SignedOut,
            generation,
        }
    }

    pub fn loading(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Initializing | SessionPhase::LoadingProfile
        )
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::initializing()
    }
}
