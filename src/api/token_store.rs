//! Bearer token persistence.
//!
//! The admin session token lives in `~/.flowdesk/token.json` with owner-only
//! permissions; writes are atomic so a crash mid-save never corrupts the
//! session. The store root is injectable so tests run against a temp dir.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::types::Admin;
use crate::util::{atomic_write_str, ensure_private_dir};

/// Persisted session credential and the admin it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default)]
    pub user: Option<Admin>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

impl StoredToken {
    pub fn new(token: impl Into<String>, user: Option<Admin>) -> Self {
        Self {
            token: token.into(),
            user,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    root: PathBuf,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            root: crate::util::data_dir(),
        }
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path(&self) -> PathBuf {
        self.root.join("token.json")
    }

    /// Load the stored session. A missing file means the operator has to log
    /// in, not that something broke.
    pub fn load(&self) -> Result<StoredToken, ApiError> {
        let path = self.path();
        if !path.exists() {
            return Err(ApiError::NotAuthenticated);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, token: &StoredToken) -> Result<(), ApiError> {
        ensure_private_dir(&self.root)?;
        let content = serde_json::to_string_pretty(token)?;
        atomic_write_str(&self.path(), &content)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_root(dir.path());

        let admin = Admin {
            id: "adm-1".to_string(),
            name: "Priya".to_string(),
            email: "priya@flowdesk.example".to_string(),
        };
        store
            .save(&StoredToken::new("session-token", Some(admin)))
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "session-token");
        assert_eq!(loaded.user.unwrap().id, "adm-1");
        assert!(loaded.saved_at.is_some());
    }

    #[test]
    fn test_missing_token_is_not_authenticated() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_root(dir.path());
        assert!(matches!(store.load(), Err(ApiError::NotAuthenticated)));
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_root(dir.path());
        store.save(&StoredToken::new("t", None)).unwrap();
        store.clear().unwrap();
        assert!(matches!(store.load(), Err(ApiError::NotAuthenticated)));
        // Clearing twice is fine.
        store.clear().unwrap();
    }
}
