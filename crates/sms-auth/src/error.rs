use std::panic::Location;

use error_location::ErrorLocation;
use sms_backend::BackendError;
use sms_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Backend request failed: {source} {location}")]
    Backend {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Invalid input for '{field}': {message} {location}")]
    InvalidInput {
        field: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid data: {source} {location}")]
    Core {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },

    #[error("Not signed in {location}")]
    NotSignedIn { location: ErrorLocation },

    #[error("Session manager has stopped {location}")]
    ManagerStopped { location: ErrorLocation },
}

impl AuthError {
    #[track_caller]
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_signed_in() -> Self {
        Self::NotSignedIn {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn manager_stopped() -> Self {
        Self::ManagerStopped {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Backend { source, .. } if source.is_rejection() => "REJECTED",
            Self::Backend { .. } => "BACKEND_UNAVAILABLE",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Core { .. } => "VALIDATION_ERROR",
            Self::NotSignedIn { .. } => "NOT_SIGNED_IN",
            Self::ManagerStopped { .. } => "MANAGER_STOPPED",
        }
    }
}

impl From<BackendError> for AuthError {
    #[track_caller]
    fn from(source: BackendError) -> Self {
        Self::Backend {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for AuthError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
