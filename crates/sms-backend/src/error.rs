use crate::NO_ROWS_CODE;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (status: {status}, code: {code}) {location}")]
    Api {
        status: u16,
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Row not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("No signed-in session {location}")]
    NotSignedIn { location: ErrorLocation },

    #[error("Session storage error at {path}: {message} {location}")]
    Storage {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },
}

impl BackendError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        BackendError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Convert JSON error with context
    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        BackendError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Build an error from a non-2xx response body.
    ///
    /// Understands both the auth API shapes (`error_code`/`msg`,
    /// `error`/`error_description`) and the REST shape (`code`/`message`).
    #[track_caller]
    pub fn from_error_body(status: u16, body: &Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        let code = text("error_code")
            .or_else(|| text("code"))
            .or_else(|| text("error"))
            .or_else(|| body.get("code").and_then(Value::as_i64).map(|c| c.to_string()))
            .unwrap_or_else(|| format!("HTTP_{status}"));

        let message = text("msg")
            .or_else(|| text("message"))
            .or_else(|| text("error_description"))
            .or_else(|| body.as_str().map(str::to_string))
            .unwrap_or_else(|| String::from("Unknown error"));

        if code == NO_ROWS_CODE {
            return BackendError::NotFound {
                message,
                location: ErrorLocation::from(Location::caller()),
            };
        }

        BackendError::Api {
            status,
            code,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_signed_in() -> Self {
        BackendError::NotSignedIn {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn storage(path: PathBuf, message: impl Into<String>) -> Self {
        BackendError::Storage {
            path,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The server answered and rejected the request (as opposed to a
    /// transport failure).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::NotFound { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        BackendError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for BackendError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        BackendError::from_json(err)
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
