use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Session file name in the session directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Officer,
}

impl Role {
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Admin | Role::Officer)
    }

    pub fn can_update_progress(&self) -> bool {
        matches!(self, Role::Admin | Role::Officer)
    }

    pub fn can_create(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Officer => write!(f, "officer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub username: String,
    pub role: Role,
    pub token: String,
    // Older session files only carry username/role/token
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// The signed-in user, if any, mirrored to `session.json`.
pub struct Session {
    session_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(session_dir: PathBuf) -> Self {
        Self {
            session_dir,
            data: None,
        }
    }

    /// Restore the session from disk. A corrupt file is removed and the
    /// session starts logged out.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(false);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        match serde_json::from_str::<SessionData>(&contents) {
            Ok(data) => {
                self.data = Some(data);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unparsable session file");
                std::fs::remove_file(&path).context("Failed to remove session file")?;
                self.data = None;
                Ok(false)
            }
        }
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Replace the current user. `None` logs out.
    pub fn set_user(&mut self, data: Option<SessionData>) -> Result<()> {
        match data {
            Some(data) => {
                self.data = Some(data);
                self.save()
            }
            None => self.clear(),
        }
    }

    /// Clear session data
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.data.as_ref().map(|d| d.role)
    }

    /// Get the bearer token if signed in
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Role of the current user if `token` is theirs.
    pub fn authorize(&self, token: &str) -> Option<Role> {
        self.data
            .as_ref()
            .filter(|d| !token.is_empty() && d.token == token)
            .map(|d| d.role)
    }

    fn session_path(&self) -> PathBuf {
        self.session_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::login;

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Admin.can_delete());
        assert!(Role::Admin.can_create());
        assert!(Role::Officer.can_edit());
        assert!(Role::Officer.can_update_progress());
        assert!(!Role::Officer.can_delete());
        assert!(!Role::Officer.can_create());
    }

    #[test]
    fn test_session_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        let data = login("officer", "officer123").unwrap();
        session.set_user(Some(data.clone())).unwrap();

        let mut reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.data, Some(data.clone()));
        assert_eq!(reloaded.authorize(&data.token), Some(Role::Officer));
        assert_eq!(reloaded.authorize("dummy-jwt-token-admin-0"), None);
    }

    #[test]
    fn test_logout_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(dir.path().to_path_buf());
        session.set_user(Some(login("admin", "admin123").unwrap())).unwrap();
        assert!(dir.path().join(SESSION_FILE).exists());

        assert!(session.token().is_some_and(|t| t.starts_with("dummy-jwt-token-admin-")));

        session.set_user(None).unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert!(!dir.path().join(SESSION_FILE).exists());
    }

    #[test]
    fn test_legacy_session_file_without_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SESSION_FILE),
            r#"{"username":"admin","role":"admin","token":"dummy-jwt-token-admin-1"}"#,
        )
        .unwrap();

        let mut session = Session::new(dir.path().to_path_buf());
        assert!(session.load().unwrap());
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.token(), Some("dummy-jwt-token-admin-1"));
    }

    #[test]
    fn test_corrupt_session_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "{ broken").unwrap();

        let mut session = Session::new(dir.path().to_path_buf());
        assert!(!session.load().unwrap());
        assert!(!session.is_authenticated());
        assert!(!dir.path().join(SESSION_FILE).exists());
    }
}
