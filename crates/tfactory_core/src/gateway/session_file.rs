//! Session persistence between process runs.
//!
//! # Invariants
//! - A missing or unreadable file restores no session and never fails.
//! - Clearing the session deletes the file.

use crate::model::session::Session;
use log::{info, warn};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the stored session, if any.
    pub fn load(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("event=session_load module=gateway status=error error={err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => {
                info!("event=session_load module=gateway status=ok");
                Some(session)
            }
            Err(err) => {
                warn!("event=session_load module=gateway status=error error={err}");
                None
            }
        }
    }

    /// Writes `session`, or removes the file for `None`.
    pub fn store(&self, session: Option<&Session>) -> io::Result<()> {
        let Some(session) = session else {
            return match std::fs::remove_file(&self.path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
                _ => Ok(()),
            };
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(session).map_err(io::Error::other)?;
        std::fs::write(&self.path, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionFile;
    use crate::model::session::{Session, SessionUser};

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(1_900_000_000),
            user: SessionUser {
                id: "u1".to_string(),
                email: None,
            },
        }
    }

    #[test]
    fn store_then_load_restores_session() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("session.json");
        let file = SessionFile::new(path.clone());

        assert_eq!(file.load(), None);
        file.store(Some(&session())).expect("store");
        assert_eq!(file.load(), Some(session()));

        file.store(None).expect("clear");
        assert!(!path.exists());
        file.store(None).expect("clearing twice is fine");
    }

    #[test]
    fn corrupt_file_restores_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").expect("write");
        assert_eq!(SessionFile::new(path).load(), None);
    }
}
