use crate::{BackendError, BackendResult, Session, SessionStorage};

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// JSON file holding the current session, written atomically
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move an unreadable session file aside so the next save starts clean.
    fn backup_corrupted(&self) -> BackendResult<PathBuf> {
        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".corrupted.{timestamp}"));
        let backup = PathBuf::from(backup);

        fs::rename(&self.path, &backup)
            .map_err(|e| BackendError::storage(self.path.clone(), e.to_string()))?;

        warn!("Backed up corrupted session file to {backup:?}");
        Ok(backup)
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> BackendResult<Option<Session>> {
        if !self.path.exists() {
            info!("No stored session at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| BackendError::storage(self.path.clone(), e.to_string()))?;

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => {
                info!("Loaded stored session for user {}", session.user.id);
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Session file corrupted at {:?}: {e}", self.path);
                self.backup_corrupted()?;
                Ok(None)
            }
        }
    }

    /// 1. Writes to temp file
    /// 2. Syncs to disk (fsync)
    /// 3. Atomic rename to final location
    fn save(&self, session: &Session) -> BackendResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| BackendError::storage(dir.clone(), e.to_string()))?;

        let mut temp_name = self.path.clone().into_os_string();
        temp_name.push(format!(".tmp.{}", std::process::id()));
        let temp_path = PathBuf::from(temp_name);

        let json = serde_json::to_string_pretty(session)?;

        // Any failure past this point must not leave the temp file behind
        let written = write_private(&temp_path, json.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path)
                && cleanup.kind() != io::ErrorKind::NotFound
            {
                warn!("Could not remove temp session file {temp_path:?}: {cleanup}");
            }
            return Err(BackendError::storage(self.path.clone(), e.to_string()));
        }

        info!("Saved session for user {}", session.user.id);
        Ok(())
    }

    fn clear(&self) -> BackendResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| BackendError::storage(self.path.clone(), e.to_string()))?;
            info!("Removed stored session at {:?}", self.path);
        }
        Ok(())
    }
}

/// Create `path` readable by the owner only, write `bytes`, fsync
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Tokens: owner read/write only
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(bytes)?;
    file.sync_all()
}
