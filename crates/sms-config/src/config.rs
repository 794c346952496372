use crate::{
    BackendConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, RoutesConfig, SessionConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub routes: RoutesConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for SMS_CONFIG_DIR env var, else use ./.sms/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply SMS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SMS_CONFIG_DIR env var > ./.sms/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.backend.validate()?;
        self.session.validate()?;
        self.routes.validate()?;
        Ok(())
    }

    /// Absolute path of the persisted session file.
    pub fn session_storage_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.session.storage_file))
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref filename) => {
                let config_dir = Self::config_dir()?;
                Ok(Some(config_dir.join(&self.logging.dir).join(filename)))
            }
            None => Ok(None),
        }
    }

    /// Log configuration summary (NEVER logs the anon key).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  backend: {} (anon key {}, timeout {}s)",
            self.backend.url,
            if self.backend.anon_key.is_some() {
                "set"
            } else {
                "missing"
            },
            self.backend.request_timeout_secs
        );
        info!(
            "  session: persist={} file={} profiles={} repair={}",
            self.session.persist,
            self.session.storage_file,
            self.session.profile_table,
            self.session.repair_missing_profiles
        );
        info!(
            "  session timeouts: profile={}ms guard={}ms",
            self.session.profile_fetch_timeout_ms, self.session.guard_timeout_ms
        );
        info!(
            "  routes: {} views (login {}, unauthorized {}, home {})",
            self.routes.views.len(),
            self.routes.login_path,
            self.routes.unauthorized_path,
            self.routes.home_path
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Backend
        Self::apply_env_string("SMS_BACKEND_URL", &mut self.backend.url);
        Self::apply_env_option_string("SMS_BACKEND_ANON_KEY", &mut self.backend.anon_key);
        Self::apply_env_parse(
            "SMS_BACKEND_TIMEOUT_SECS",
            &mut self.backend.request_timeout_secs,
        );

        // Session
        Self::apply_env_bool("SMS_SESSION_PERSIST", &mut self.session.persist);
        Self::apply_env_string("SMS_SESSION_STORAGE_FILE", &mut self.session.storage_file);
        Self::apply_env_string("SMS_PROFILE_TABLE", &mut self.session.profile_table);
        Self::apply_env_bool(
            "SMS_REPAIR_MISSING_PROFILES",
            &mut self.session.repair_missing_profiles,
        );
        Self::apply_env_parse(
            "SMS_PROFILE_FETCH_TIMEOUT_MS",
            &mut self.session.profile_fetch_timeout_ms,
        );
        Self::apply_env_parse("SMS_GUARD_TIMEOUT_MS", &mut self.session.guard_timeout_ms);

        // Logging
        Self::apply_env_parse("SMS_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SMS_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SMS_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
