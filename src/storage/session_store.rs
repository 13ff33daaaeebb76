use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::models::user::UserDto;

/// On-disk shape: the three credential keys a logged-in client carries.
/// The refresh token is stored but unusable; no refresh endpoint exists
/// server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserDto>,
}

/// File-backed session cache. Single writer (the auth service and the 401
/// teardown path), many readers.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    inner: RwLock<StoredSession>,
}

impl SessionStore {
    /// Loads the session file if present. A missing or unreadable file just
    /// means no session.
    pub fn load(path: PathBuf) -> Self {
        let session = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(session) => session,
                Err(e) => {
                    warn!("Discarding corrupt session file {}: {}", path.display(), e);
                    StoredSession::default()
                }
            },
            Err(_) => StoredSession::default(),
        };

        Self {
            path,
            inner: RwLock::new(session),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().unwrap().token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().unwrap().refresh_token.clone()
    }

    pub fn user(&self) -> Option<UserDto> {
        self.inner.read().unwrap().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let session = self.inner.read().unwrap();
        session.token.is_some() && session.user.is_some()
    }

    pub fn set_session(
        &self,
        token: String,
        refresh_token: String,
        user: Option<UserDto>,
    ) -> Result<()> {
        {
            let mut session = self.inner.write().unwrap();
            session.token = Some(token);
            session.refresh_token = Some(refresh_token);
            if user.is_some() {
                session.user = user;
            }
        }
        self.persist()
    }

    /// Clears all three keys and removes the session file.
    pub fn clear(&self) {
        {
            let mut session = self.inner.write().unwrap();
            *session = StoredSession::default();
        }
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Could not remove session file {}: {}", self.path.display(), e);
            }
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let session = self.inner.read().unwrap();
        let raw = serde_json::to_string_pretty(&*session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
