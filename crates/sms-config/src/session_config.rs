use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_GUARD_TIMEOUT_MS, DEFAULT_PROFILE_FETCH_TIMEOUT_MS,
    DEFAULT_PROFILE_TABLE, DEFAULT_REPAIR_MISSING_PROFILES, DEFAULT_SESSION_PERSIST,
    DEFAULT_SESSION_STORAGE_FILE, MAX_GUARD_TIMEOUT_MS, MAX_PROFILE_FETCH_TIMEOUT_MS,
    MIN_GUARD_TIMEOUT_MS, MIN_PROFILE_FETCH_TIMEOUT_MS,
};

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keep the session on disk between runs
    pub persist: bool,
    /// Session file, relative to the config directory
    pub storage_file: String,
    /// Table holding one profile row per identity
    pub profile_table: String,
    /// Insert a default profile row when none exists for a signed-in identity
    pub repair_missing_profiles: bool,
    pub profile_fetch_timeout_ms: u64,
    /// How long a navigation waits for a loading session before denying
    pub guard_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: DEFAULT_SESSION_PERSIST,
            storage_file: String::from(DEFAULT_SESSION_STORAGE_FILE),
            profile_table: String::from(DEFAULT_PROFILE_TABLE),
            repair_missing_profiles: DEFAULT_REPAIR_MISSING_PROFILES,
            profile_fetch_timeout_ms: DEFAULT_PROFILE_FETCH_TIMEOUT_MS,
            guard_timeout_ms: DEFAULT_GUARD_TIMEOUT_MS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let storage = Path::new(&self.storage_file);
        if self.storage_file.is_empty()
            || storage.is_absolute()
            || self.storage_file.contains("..")
        {
            return Err(ConfigError::session(
                "session.storage_file must be relative and cannot contain '..'",
            ));
        }

        let table_ok = !self.profile_table.is_empty()
            && self
                .profile_table
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !table_ok {
            return Err(ConfigError::session(format!(
                "session.profile_table must be a lowercase identifier, got '{}'",
                self.profile_table
            )));
        }

        if !(MIN_PROFILE_FETCH_TIMEOUT_MS..=MAX_PROFILE_FETCH_TIMEOUT_MS)
            .contains(&self.profile_fetch_timeout_ms)
        {
            return Err(ConfigError::session(format!(
                "session.profile_fetch_timeout_ms must be {}-{}, got {}",
                MIN_PROFILE_FETCH_TIMEOUT_MS, MAX_PROFILE_FETCH_TIMEOUT_MS,
                self.profile_fetch_timeout_ms
            )));
        }

        if !(MIN_GUARD_TIMEOUT_MS..=MAX_GUARD_TIMEOUT_MS).contains(&self.guard_timeout_ms) {
            return Err(ConfigError::session(format!(
                "session.guard_timeout_ms must be {}-{}, got {}",
                MIN_GUARD_TIMEOUT_MS, MAX_GUARD_TIMEOUT_MS, self.guard_timeout_ms
            )));
        }

        Ok(())
    }

    pub fn profile_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.profile_fetch_timeout_ms)
    }

    pub fn guard_timeout(&self) -> Duration {
        Duration::from_millis(self.guard_timeout_ms)
    }
}
