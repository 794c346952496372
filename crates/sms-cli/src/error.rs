use std::panic::Location;

use error_location::ErrorLocation;
use sms_auth::AuthError;
use sms_backend::BackendError;
use sms_config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the `sms` binary
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {source} {location}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Auth {
        #[source]
        source: AuthError,
        location: ErrorLocation,
    },

    #[error("Backend error: {source} {location}")]
    Backend {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("No password given: pass --password or set SMS_PASSWORD {location}")]
    MissingPassword { location: ErrorLocation },

    #[error("Failed to render output: {source} {location}")]
    Output {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn logger(message: impl Into<String>) -> Self {
        CliError::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_password() -> Self {
        CliError::MissingPassword {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        CliError::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<AuthError> for CliError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        CliError::Auth {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<BackendError> for CliError {
    #[track_caller]
    fn from(source: BackendError) -> Self {
        CliError::Backend {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        CliError::Output {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
