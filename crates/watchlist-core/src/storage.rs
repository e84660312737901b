use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use watchlist_models::WatchlistEntry;

use crate::error::PersistenceError;

/// Highest document version this build reads and the version it writes
pub const STORAGE_VERSION: u32 = 0;

/// On-disk shape: `{ "state": { "items": [...] }, "version": 0 }`
#[derive(Debug, Serialize, Deserialize)]
struct PersistedWatchlist {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    items: Vec<WatchlistEntry>,
}

#[derive(Serialize)]
struct PersistedWatchlistRef<'a> {
    state: PersistedStateRef<'a>,
    version: u32,
}

#[derive(Serialize)]
struct PersistedStateRef<'a> {
    items: &'a [WatchlistEntry],
}

pub fn encode(entries: &[WatchlistEntry]) -> Result<String, PersistenceError> {
    let document = PersistedWatchlistRef {
        state: PersistedStateRef { items: entries },
        version: STORAGE_VERSION,
    };
    serde_json::to_string_pretty(&document).map_err(|e| PersistenceError::Serialize(e.to_string()))
}

pub fn decode(content: &str) -> Result<Vec<WatchlistEntry>, PersistenceError> {
    let document: PersistedWatchlist =
        serde_json::from_str(content).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    if document.version > STORAGE_VERSION {
        return Err(PersistenceError::IncompatibleVersion {
            found: document.version,
            supported: STORAGE_VERSION,
        });
    }
    Ok(document.state.items)
}

/// Durable mirror of the watchlist collection
pub trait WatchlistStorage {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<Vec<WatchlistEntry>>, PersistenceError>;

    /// Replace the stored record with `entries`
    fn save(&self, entries: &[WatchlistEntry]) -> Result<(), PersistenceError>;

    fn describe(&self) -> String;
}

/// Single JSON file, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Keep an unreadable file around for inspection instead of silently overwriting it
    fn back_up_unreadable(&self, reason: &PersistenceError) {
        let backup_path = self.backup_path();
        match std::fs::copy(&self.path, &backup_path) {
            Ok(_) => info!(
                "Watchlist storage unreadable ({}). Backed up to {:?}",
                reason, backup_path
            ),
            Err(e) => warn!("Failed to back up unreadable watchlist storage: {}", e),
        }
    }
}

impl WatchlistStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<WatchlistEntry>>, PersistenceError> {
        if !self.path.exists() {
            debug!("Watchlist storage {:?} does not exist", self.path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.clone(),
            source,
        })?;

        match decode(&content) {
            Ok(items) => {
                info!("Loaded {} watchlist entries from {:?}", items.len(), self.path);
                Ok(Some(items))
            }
            Err(e) => {
                self.back_up_unreadable(&e);
                Err(e)
            }
        }
    }

    fn save(&self, entries: &[WatchlistEntry]) -> Result<(), PersistenceError> {
        let json = encode(entries)?;
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json).map_err(write_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;

        debug!("Watchlist saved: {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    document: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// In-process storage holding the serialized document; clones share state.
///
/// Writes go through the same codec as the file storage, so round-trips are
/// exercised without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.state().document = Some(document.into());
        storage
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn document(&self) -> Option<String> {
        self.state().document.clone()
    }

    /// Simulate an unavailable backend (quota exceeded, storage disabled)
    pub fn set_fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    pub fn write_count(&self) -> usize {
        self.state().writes
    }
}

impl WatchlistStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<WatchlistEntry>>, PersistenceError> {
        match self.state().document.as_deref() {
            Some(document) => decode(document).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, entries: &[WatchlistEntry]) -> Result<(), PersistenceError> {
        let json = encode(entries)?;
        let mut state = self.state();
        if state.fail_writes {
            return Err(PersistenceError::Unavailable("storage quota exceeded".to_string()));
        }
        state.document = Some(json);
        state.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use watchlist_models::{EntryId, MediaType, NewEntry, Rating, WatchStatus};

    fn entry(id: &str, catalog_id: u64, notes: Option<&str>) -> WatchlistEntry {
        NewEntry {
            catalog_id,
            media_type: MediaType::Movie,
            title: format!("Movie {}", catalog_id),
            poster_path: None,
            backdrop_path: Some("/backdrop.jpg".to_string()),
            release_date: None,
            vote_average: 7.5,
            overview: "overview".to_string(),
            status: WatchStatus::Watched,
            rating: Some(Rating::new(8).unwrap()),
            notes: notes.map(str::to_string),
        }
        .into_entry(EntryId::new(id), Utc::now())
    }

    #[test]
    fn test_document_shape() {
        let json = encode(&[entry("a", 1, None)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(value["state"]["items"][0]["id"], "a");
        assert!(value["state"]["items"][0]["added_at"].is_string());
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let err = decode(r#"{"state":{"items":[]},"version":3}"#).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::IncompatibleVersion { found: 3, supported: 0 }
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_rating() {
        let mut value = serde_json::to_value(entry("a", 1, None)).unwrap();
        value["rating"] = serde_json::json!(11);
        let document = serde_json::json!({ "state": { "items": [value] }, "version": 0 });
        assert!(matches!(
            decode(&document.to_string()),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("data").join("watchlist-storage.json"));
        assert!(storage.load().unwrap().is_none());

        let entries = vec![entry("a", 1, Some("great")), entry("b", 2, None)];
        storage.save(&entries).unwrap();
        assert!(storage.exists());
        assert!(!storage.path().with_extension("json.tmp").exists());

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_file_storage_backs_up_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("watchlist-storage.json"));
        std::fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
        assert_eq!(
            std::fs::read_to_string(storage.backup_path()).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_memory_storage_failing_writes() {
        let storage = MemoryStorage::new();
        storage.save(&[entry("a", 1, None)]).unwrap();
        assert_eq!(storage.write_count(), 1);

        storage.set_fail_writes(true);
        assert!(matches!(
            storage.save(&[]),
            Err(PersistenceError::Unavailable(_))
        ));
        // previous document survives the failed write
        assert_eq!(storage.load().unwrap().unwrap().len(), 1);
    }
}
