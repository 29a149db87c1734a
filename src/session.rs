//! Selected-customer state.
//!
//! Nearly every view is scoped to one customer. The selection is made
//! explicitly, persisted to `~/.flowdesk/customer.json` so it survives
//! process restarts, and cleared on an explicit switch or logout. There is a
//! single operator per store, so last-writer-wins is the whole concurrency
//! story.

use std::path::{Path, PathBuf};

use crate::types::Customer;
use crate::util::{atomic_write_str, ensure_private_dir};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No customer selected. Run `flowdesk customers select <id>` first.")]
    NoCustomerSelected,
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CustomerStore {
    root: PathBuf,
}

impl CustomerStore {
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
        self.root.join("customer.json")
    }

    /// The active customer, restored from disk. A corrupt file is discarded
    /// rather than wedging every scoped command behind a parse error.
    pub fn load(&self) -> Result<Customer, SessionError> {
        let path = self.path();
        if !path.exists() {
            return Err(SessionError::NoCustomerSelected);
        }
        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(customer) => Ok(customer),
            Err(err) => {
                log::warn!("discarding unreadable {}: {}", path.display(), err);
                let _ = std::fs::remove_file(&path);
                Err(SessionError::NoCustomerSelected)
            }
        }
    }

    pub fn select(&self, customer: &Customer) -> Result<(), SessionError> {
        ensure_private_dir(&self.root)?;
        let content = serde_json::to_string_pretty(customer)?;
        atomic_write_str(&self.path(), &content)?;
        log::info!("selected customer {} ({})", customer.name, customer.id);
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for CustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: "Meera Nair".to_string(),
            email: "meera@example.com".to_string(),
            phone: None,
            city: Some("Kochi".to_string()),
            customer_type: Some("B2C".to_string()),
            admin_manager: None,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_selection_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = CustomerStore::with_root(dir.path());
        store.select(&customer("cust-42")).unwrap();

        // A fresh store over the same root simulates a process restart.
        let reopened = CustomerStore::with_root(dir.path());
        let restored = reopened.load().unwrap();
        assert_eq!(restored.id, "cust-42");
        assert_eq!(restored.name, "Meera Nair");
    }

    #[test]
    fn test_no_selection_is_explicit_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CustomerStore::with_root(dir.path());
        assert!(matches!(store.load(), Err(SessionError::NoCustomerSelected)));
    }

    #[test]
    fn test_clear_removes_selection() {
        let dir = tempfile::tempdir().unwrap();
        let store = CustomerStore::with_root(dir.path());
        store.select(&customer("cust-1")).unwrap();
        store.clear().unwrap();
        assert!(matches!(store.load(), Err(SessionError::NoCustomerSelected)));
    }

    #[test]
    fn test_reselect_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = CustomerStore::with_root(dir.path());
        store.select(&customer("cust-1")).unwrap();
        store.select(&customer("cust-2")).unwrap();
        assert_eq!(store.load().unwrap().id, "cust-2");
    }

    #[test]
    fn test_corrupt_file_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = CustomerStore::with_root(dir.path());
        std::fs::write(dir.path().join("customer.json"), "{not json").unwrap();
        assert!(matches!(store.load(), Err(SessionError::NoCustomerSelected)));
        assert!(!dir.path().join("customer.json").exists());
    }
}
