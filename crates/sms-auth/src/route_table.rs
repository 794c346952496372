use crate::SessionSnapshot;

use serde::Serialize;
use sms_config::{RoutesConfig, ViewConfig, normalize_path};
use sms_core::Role;

/// A gated view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteView {
    pub path: String,
    pub title: String,
    /// None = any signed-in user
    pub allowed_roles: Option<Vec<Role>>,
}

impl RouteView {
    pub fn allowed_roles(&self) -> Option<&[Role]> {
        self.allowed_roles.as_deref()
    }

    /// Whether a settled snapshot may open this view
    pub fn admits(&self, snapshot: &SessionSnapshot) -> bool {
        if snapshot.identity.is_none() {
            return false;
        }
        match (&self.allowed_roles, &snapshot.profile) {
            (None, _) => true,
            (Some(allowed), Some(profile)) => profile.has_role_in(allowed),
            (Some(_), None) => false,
        }
    }
}

impl From<&ViewConfig> for RouteView {
    fn from(view: &ViewConfig) -> Self {
        Self {
            path: normalize_path(&view.path),
            title: view.title.clone(),
            allowed_roles: view.allowed_roles.clone(),
        }
    }
}

/// Known paths: two public pages plus the gated views
#[derive(Debug, Clone)]
pub struct RouteTable {
    login_path: String,
    unauthorized_path: String,
    home_path: String,
    views: Vec<RouteView>,
}

impl RouteTable {
    pub fn from_config(config: &RoutesConfig) -> Self {
        Self {
            login_path: normalize_path(&config.login_path),
            unauthorized_path: normalize_path(&config.unauthorized_path),
            home_path: normalize_path(&config.home_path),
            views: config.views.iter().map(RouteView::from).collect(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn unauthorized_path(&self) -> &str {
        &self.unauthorized_path
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn views(&self) -> &[RouteView] {
        &self.views
    }

    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize_path(path);
        path == self.login_path || path == self.unauthorized_path
    }

    pub fn find(&self, path: &str) -> Option<&RouteView> {
        let path = normalize_path(path);
        self.views.iter().find(|view| view.path == path)
    }

    /// Views the snapshot may open, in table order (the navigation menu)
    pub fn visible_views(&self, snapshot: &SessionSnapshot) -> Vec<&RouteView> {
        self.views
            .iter()
            .filter(|view| view.admits(snapshot))
            .collect()
    }

    /// Where to land after signing in: the preserved path when it names a
    /// gated view, else home
    pub fn post_login_target(&self, return_to: Option<&str>) -> String {
        return_to
            .and_then(|path| self.find(path))
            .map(|view| view.path.clone())
            .unwrap_or_else(|| self.home_path.clone())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&RoutesConfig::default())
    }
}
