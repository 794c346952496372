use crate::{GuardDecision, RouteGuard, RouteTable, RouteView, SessionHandle, SessionSnapshot};

use serde::Serialize;

/// Result of asking for a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// Login or unauthorized page; never guarded
    Public { path: String },
    NotFound { path: String },
    Guarded {
        view: RouteView,
        decision: GuardDecision,
    },
}

/// Route table plus guard: the one place navigations are decided
#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
    guard: RouteGuard,
}

impl Navigator {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self { table, guard }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Decide against one snapshot without waiting
    pub fn evaluate(&self, snapshot: &SessionSnapshot, path: &str) -> RouteOutcome {
        match self.lookup(path) {
            Err(outcome) => outcome,
            Ok(view) => {
                let decision = self.guard.evaluate(snapshot, path, view.allowed_roles());
                RouteOutcome::Guarded {
                    view: view.clone(),
                    decision,
                }
            }
        }
    }

    /// Decide, waiting for the session to settle if needed
    pub async fn navigate(&self, handle: &SessionHandle, path: &str) -> RouteOutcome {
        match self.lookup(path) {
            Err(outcome) => outcome,
            Ok(view) => {
                let decision = self.guard.resolve(handle, path, view.allowed_roles()).await;
                RouteOutcome::Guarded {
                    view: view.clone(),
                    decision,
                }
            }
        }
    }

    fn lookup(&self, path: &str) -> Result<&RouteView, RouteOutcome> {
        if self.table.is_public(path) {
            return Err(RouteOutcome::Public {
                path: path.to_string(),
            });
        }
        self.table.find(path).ok_or_else(|| RouteOutcome::NotFound {
            path: path.to_string(),
        })
    }
}
