use crate::{CoreError, Result as CoreErrorResult, Role};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Partial profile update. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.avatar_url.is_none() && self.role.is_none()
    }

    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.is_empty() {
            return Err(CoreError::Validation {
                message: "profile update has no fields".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(CoreError::Validation {
                message: "full_name cannot be blank".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
