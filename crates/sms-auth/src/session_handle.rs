use crate::{AuthError, Result, SessionSnapshot};

use tokio::sync::watch;

/// Read-only view of the session, cheap to clone and hand out
#[derive(Clone)]
pub struct SessionHandle {
    receiver: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub(crate) fn new(receiver: watch::Receiver<SessionSnapshot>) -> Self {
        Self { receiver }
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait until a snapshot satisfies `predicate` (checking the current one
    /// first). Fails once the manager has stopped.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot> {
        match self.receiver.wait_for(predicate).await {
            Ok(snapshot) => Ok(snapshot.clone()),
            Err(_) => Err(AuthError::manager_stopped()),
        }
    }

    /// Wait until the initial lookup and any profile resolution are done
    pub async fn settled(&mut self) -> Result<SessionSnapshot> {
        self.wait_for(|snapshot| !snapshot.loading()).await
    }
}
