use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::media::{CatalogItem, CatalogKey, MediaType};
use crate::rating::Rating;
use crate::status::WatchStatus;

/// Locally generated identifier of a watchlist entry.
///
/// Distinct from the natural key; never reused while the entry exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: EntryId,
    pub catalog_id: u64,
    pub media_type: MediaType,
    // Snapshot of the catalog item taken when the entry was added
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    pub status: WatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
    /// Only meaningful while `status` is `Watched`; kept if the status later changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.catalog_id, self.media_type)
    }

    pub fn matches(&self, key: &CatalogKey) -> bool {
        self.catalog_id == key.catalog_id && self.media_type == key.media_type
    }
}

/// Input for adding an entry: everything except the fields the store assigns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub catalog_id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub overview: String,
    #[serde(default)]
    pub status: WatchStatus,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

impl NewEntry {
    /// Snapshot a catalog item as a new `WantToWatch` entry
    pub fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            catalog_id: item.catalog_id,
            media_type: item.media_type,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            backdrop_path: item.backdrop_path.clone(),
            release_date: item.release_date.clone(),
            vote_average: item.vote_average,
            overview: item.overview.clone(),
            status: WatchStatus::WantToWatch,
            rating: None,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: WatchStatus) -> Self {
        self.status = status;
        self
    }

    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.catalog_id, self.media_type)
    }

    pub fn into_entry(self, id: EntryId, added_at: DateTime<Utc>) -> WatchlistEntry {
        WatchlistEntry {
            id,
            catalog_id: self.catalog_id,
            media_type: self.media_type,
            title: self.title,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date: self.release_date,
            vote_average: self.vote_average,
            overview: self.overview,
            status: self.status,
            rating: self.rating,
            notes: self.notes,
            added_at,
            watched_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewEntry {
        NewEntry {
            catalog_id: 1399,
            media_type: MediaType::Show,
            title: "Game of Thrones".to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            release_date: Some("2011-04-17".to_string()),
            vote_average: 8.4,
            overview: "Seven noble families fight for control.".to_string(),
            status: WatchStatus::default(),
            rating: None,
            notes: None,
        }
    }

    #[test]
    fn test_into_entry_keeps_snapshot() {
        let now = Utc::now();
        let entry = sample().into_entry(EntryId::new("tv_1399_1_0"), now);
        assert_eq!(entry.key(), CatalogKey::show(1399));
        assert_eq!(entry.status, WatchStatus::WantToWatch);
        assert_eq!(entry.added_at, now);
        assert!(entry.watched_at.is_none());
        assert!(entry.matches(&CatalogKey::show(1399)));
        assert!(!entry.matches(&CatalogKey::movie(1399)));
    }

    #[test]
    fn test_entry_omits_absent_optionals() {
        let entry = sample().into_entry(EntryId::new("tv_1399_1_0"), Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("rating").is_none());
        assert!(json.get("notes").is_none());
        assert!(json.get("backdrop_path").is_none());
        assert_eq!(json["media_type"], "tv");
        assert_eq!(json["status"], "want_to_watch");
    }

    #[test]
    fn test_entry_reads_null_as_absent() {
        let entry = sample().into_entry(EntryId::new("tv_1399_1_0"), Utc::now());
        let mut json = serde_json::to_value(&entry).unwrap();
        json["notes"] = serde_json::Value::Null;
        let back: WatchlistEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
