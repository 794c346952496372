use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOME_PATH, DEFAULT_LOGIN_PATH,
    DEFAULT_UNAUTHORIZED_PATH,
};

use std::collections::HashSet;

use serde::Deserialize;
use sms_core::Role;

/// One dashboard view reachable by path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewConfig {
    pub path: String,
    pub title: String,
    /// None = any signed-in user may open the view
    #[serde(default)]
    pub allowed_roles: Option<Vec<Role>>,
}

impl ViewConfig {
    fn new(path: &str, title: &str, allowed_roles: Option<&[Role]>) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            allowed_roles: allowed_roles.map(<[Role]>::to_vec),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub login_path: String,
    pub unauthorized_path: String,
    /// Landing view after login when no return path was preserved
    pub home_path: String,
    pub views: Vec<ViewConfig>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        const BACK_OFFICE: &[Role] = &[Role::Admin, Role::Staff];
        const ADMIN_ONLY: &[Role] = &[Role::Admin];

        Self {
            login_path: String::from(DEFAULT_LOGIN_PATH),
            unauthorized_path: String::from(DEFAULT_UNAUTHORIZED_PATH),
            home_path: String::from(DEFAULT_HOME_PATH),
            views: vec![
                ViewConfig::new("/", "Enquiries", Some(BACK_OFFICE)),
                ViewConfig::new("/students", "Students", Some(BACK_OFFICE)),
                ViewConfig::new("/courses", "Courses", Some(BACK_OFFICE)),
                ViewConfig::new("/appointments", "Appointments", Some(BACK_OFFICE)),
                ViewConfig::new("/reports", "Reports", Some(ADMIN_ONLY)),
                ViewConfig::new("/settings", "Settings", Some(ADMIN_ONLY)),
                ViewConfig::new("/help", "Help", None),
            ],
        }
    }
}

impl RoutesConfig {
    /// Paths are compared the way navigation resolves them, so `/students/`
    /// and `/students` are the same view.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, path) in [
            ("routes.login_path", &self.login_path),
            ("routes.unauthorized_path", &self.unauthorized_path),
            ("routes.home_path", &self.home_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::routes(format!(
                    "{name} must start with '/', got '{path}'"
                )));
            }
        }

        let login = normalize_path(&self.login_path);
        let unauthorized = normalize_path(&self.unauthorized_path);
        if login == unauthorized {
            return Err(ConfigError::routes(
                "routes.login_path and routes.unauthorized_path must differ",
            ));
        }

        let mut seen = HashSet::new();
        for view in &self.views {
            if !view.path.starts_with('/') {
                return Err(ConfigError::routes(format!(
                    "view path must start with '/', got '{}'",
                    view.path
                )));
            }
            let path = normalize_path(&view.path);
            if path == login || path == unauthorized {
                return Err(ConfigError::routes(format!(
                    "view '{}' collides with a public path",
                    view.path
                )));
            }
            if view
                .allowed_roles
                .as_ref()
                .is_some_and(|roles| roles.is_empty())
            {
                return Err(ConfigError::routes(format!(
                    "view '{}' has an empty allowed_roles list (omit it to allow any user)",
                    view.path
                )));
            }
            if !seen.insert(path) {
                return Err(ConfigError::routes(format!(
                    "duplicate view path '{}'",
                    view.path
                )));
            }
        }

        if !seen.contains(&normalize_path(&self.home_path)) {
            return Err(ConfigError::routes(format!(
                "routes.home_path '{}' is not a configured view",
                self.home_path
            )));
        }

        Ok(())
    }
}

/// Drop query and fragment, collapse trailing slashes. Empty means root.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');

    if trimmed.is_empty() {
        String::from("/")
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
