use crate::{BackendResult, Session, SessionStorage};

use std::sync::{Mutex, PoisonError};

/// Process-local storage; the session is forgotten on exit
#[derive(Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> BackendResult<Option<Session>> {
        let guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> BackendResult<()> {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> BackendResult<()> {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}
