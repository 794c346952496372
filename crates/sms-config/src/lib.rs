mod backend_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod routes_config;
mod session_config;

#[cfg(test)]
mod tests;

pub use backend_config::BackendConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use routes_config::{RoutesConfig, ViewConfig, normalize_path};
pub use session_config::SessionConfig;

const CONFIG_DIR_ENV: &str = "SMS_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".sms";
const CONFIG_FILE_NAME: &str = "config.toml";

// Backend
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

// Session
const DEFAULT_SESSION_PERSIST: bool = true;
const DEFAULT_SESSION_STORAGE_FILE: &str = "session.json";
const DEFAULT_PROFILE_TABLE: &str = "profiles";
const DEFAULT_REPAIR_MISSING_PROFILES: bool = true;
const DEFAULT_PROFILE_FETCH_TIMEOUT_MS: u64 = 5_000;
const MIN_PROFILE_FETCH_TIMEOUT_MS: u64 = 100;
const MAX_PROFILE_FETCH_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_GUARD_TIMEOUT_MS: u64 = 10_000;
const MIN_GUARD_TIMEOUT_MS: u64 = 100;
const MAX_GUARD_TIMEOUT_MS: u64 = 120_000;

// Routes
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";
const DEFAULT_HOME_PATH: &str = "/";

// Logging
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
