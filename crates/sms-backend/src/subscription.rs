use crate::AuthEvent;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Handle on the session-change stream. Dropping it unsubscribes.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    pub fn new(receiver: broadcast::Receiver<AuthEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next notification.
    ///
    /// `Err(RecvError::Lagged(_))` means notifications were dropped and the
    /// caller should re-read the current session.
    pub async fn recv(&mut self) -> Result<AuthEvent, RecvError> {
        self.receiver.recv().await
    }

    pub fn unsubscribe(self) {
        log::debug!("Auth subscription closed");
    }
}
