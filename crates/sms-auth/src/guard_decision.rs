use serde::Serialize;

/// What a navigation to a gated view should do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session not settled yet; show a placeholder, do not redirect
    Loading,
    Render,
    RedirectToLogin {
        login_path: String,
        /// Where to go back to after signing in
        return_to: String,
    },
    RedirectToUnauthorized { path: String },
}

impl GuardDecision {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }

    /// Target path for redirects
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::RedirectToLogin { login_path, .. } => Some(login_path),
            Self::RedirectToUnauthorized { path } => Some(path),
            Self::Loading | Self::Render => None,
        }
    }
}
