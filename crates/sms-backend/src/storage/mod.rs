//! Where the signed-in session lives between runs.

mod file_session_storage;
mod memory_session_storage;

pub use file_session_storage::FileSessionStorage;
pub use memory_session_storage::MemorySessionStorage;

use crate::{BackendResult, Session};

pub trait SessionStorage: Send + Sync {
    /// Ok(None) when nothing is stored or the stored copy is unusable
    fn load(&self) -> BackendResult<Option<Session>>;
    fn save(&self, session: &Session) -> BackendResult<()>;
    fn clear(&self) -> BackendResult<()>;
}
