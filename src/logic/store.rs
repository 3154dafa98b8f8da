//! Alert Store
//!
//! Flat JSON collection, append-on-save. Thread-safe; unreadable content
//! degrades to an empty collection instead of failing readers.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::constants;
use crate::logic::alert::{Alert, AlertStatus};

// ============================================================================
// ERROR
// ============================================================================

#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Store I/O error: {}", e),
            StoreError::Serialize(e) => write!(f, "Store serialize error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

// ============================================================================
// ALERT STORE
// ============================================================================

pub struct AlertStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AlertStore {
    /// Open a store at the given path, creating parents and an empty
    /// collection when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        if !path.exists() {
            fs::write(&path, "[]").map_err(|e| StoreError::Io(e.to_string()))?;
        }

        log::info!("Alert store opened: {:?}", path);
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Default location under the local data dir, overridable by env
    pub fn open_default() -> Result<Self, StoreError> {
        let path = constants::get_store_path()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("soc-ai")
                    .join("alerts.json")
            });
        Self::open(path)
    }

    /// Persist one record. Assigns id and timestamp when missing; the id
    /// is stable from then on.
    pub fn save(&self, alert: &mut Alert) -> Result<(), StoreError> {
        let _guard = self.lock.lock();

        if alert.id.is_none() {
            alert.id = Some(Uuid::new_v4().to_string());
        }
        if alert.timestamp.is_empty() {
            alert.timestamp = Utc::now().to_rfc3339();
        }

        let mut all = self.read_all();
        all.push(alert.clone());
        self.write_all(&all)
    }

    pub fn get_by_id(&self, id: &str) -> Option<Alert> {
        let _guard = self.lock.lock();
        self.read_all()
            .into_iter()
            .find(|a| a.id.as_deref() == Some(id))
    }

    /// Update the status of the first record with this id.
    /// Returns false when no record matched.
    pub fn update_status(&self, id: &str, status: AlertStatus) -> Result<bool, StoreError> {
        let _guard = self.lock.lock();
        let mut all = self.read_all();

        match all.iter_mut().find(|a| a.id.as_deref() == Some(id)) {
            Some(alert) => {
                alert.status = status;
                self.write_all(&all)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get_all(&self) -> Vec<Alert> {
        let _guard = self.lock.lock();
        self.read_all()
    }

    pub fn count(&self) -> usize {
        let _guard = self.lock.lock();
        self.read_all().len()
    }

    fn read_all(&self) -> Vec<Alert> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::error!("Alert store unreadable, starting empty: {}", e);
                Vec::new()
            }),
            Err(e) => {
                log::error!("Error reading alerts: {}", e);
                Vec::new()
            }
        }
    }

    fn write_all(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(alerts)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::alert::classify;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AlertStore {
        AlertStore::open(dir.path().join("alerts.json")).unwrap()
    }

    #[test]
    fn test_save_assigns_id_and_keeps_it_stable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut alert = classify(&json!({ "type": "traffic" }));
        assert!(alert.id.is_none());

        store.save(&mut alert).unwrap();
        let id = alert.id.clone().unwrap();

        store.save(&mut alert).unwrap();
        assert_eq!(alert.id.as_deref(), Some(id.as_str()));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_save_stamps_missing_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut alert = classify(&json!({ "type": "traffic" }));
        alert.timestamp = String::new();
        store.save(&mut alert).unwrap();
        assert!(!alert.timestamp.is_empty());
    }

    #[test]
    fn test_get_by_id_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut alert = classify(&json!({ "type": "traffic", "srcip": "10.0.0.1" }));
        store.save(&mut alert).unwrap();

        let loaded = store.get_by_id(alert.id.as_deref().unwrap()).unwrap();
        assert_eq!(loaded.alert_type, alert.alert_type);
        assert_eq!(loaded.original, alert.original);
        assert!(store.get_by_id("missing").is_none());
    }

    #[test]
    fn test_update_status() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut alert = classify(&json!({ "type": "traffic" }));
        store.save(&mut alert).unwrap();
        let id = alert.id.clone().unwrap();

        assert!(store.update_status(&id, AlertStatus::Analyzed).unwrap());
        assert_eq!(store.get_by_id(&id).unwrap().status, AlertStatus::Analyzed);
        assert!(!store.update_status("missing", AlertStatus::Failed).unwrap());
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = AlertStore::open(&path).unwrap();
        assert!(store.get_all().is_empty());

        // And the store recovers on the next save
        let mut alert = classify(&json!({ "type": "traffic" }));
        store.save(&mut alert).unwrap();
        assert_eq!(store.count(), 1);
    }
}
