use std::time::Duration;

use sms_config::SessionConfig;

/// Tunables of the session loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Upper bound for one profile lookup (and for the repair insert)
    pub profile_fetch_timeout: Duration,
    /// Insert a default profile row when none exists
    pub repair_missing_profiles: bool,
}

impl SessionSettings {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            profile_fetch_timeout: config.profile_fetch_timeout(),
            repair_missing_profiles: config.repair_missing_profiles,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
