//! Filesystem Session Store
//!
//! One JSON document per thread under a data directory. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-save
//! leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use host_core::{
    error::{HostError, Result},
    message::ThreadId,
    session::{Session, SessionStore},
};

/// Filesystem-backed session store
pub struct FsSessionStore {
    dir: PathBuf,
}

impl FsSessionStore {
    /// Store rooted at `dir`, created if missing
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &ThreadId) -> Result<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(HostError::Session(format!("invalid thread id: {id:?}")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

async fn read_session(path: &Path) -> Result<Session> {
    let raw = tokio::fs::read(path).await?;
    serde_json::from_slice(&raw)
        .map_err(|e| HostError::Session(format!("corrupt session {}: {e}", path.display())))
}

#[async_trait]
impl SessionStore for FsSessionStore {
    async fn load(&self, id: &ThreadId) -> Result<Option<Session>> {
        let path = self.path(id)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        read_session(&path).await.map(Some)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let path = self.path(&session.id)?;
        let tmp = path.with_extension("json.tmp");

        let data = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(thread_id = %session.id, messages = session.message_count(), "session saved");
        Ok(())
    }

    async fn delete(&self, id: &ThreadId) -> Result<()> {
        let path = self.path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, limit: usize) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match read_session(&path).await {
                Ok(session) => sessions.push(session),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable session"),
            }
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions.truncate(limit);
        Ok(sessions)
    }
}
