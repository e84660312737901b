use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::MediaType;
use crate::rating::Rating;
use crate::status::WatchStatus;
use crate::watchlist::WatchlistEntry;

/// Change to an optional field: leave it, clear it, or set a new value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// `Some(v)` sets, `None` clears
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Clear,
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => *slot = None,
            FieldUpdate::Set(v) => *slot = Some(v),
        }
    }
}

/// Shallow field-level update of a watchlist entry.
///
/// `None` on a required field and `FieldUpdate::Keep` on an optional field
/// both leave the current value untouched. `id` and `added_at` cannot change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub catalog_id: Option<u64>,
    pub media_type: Option<MediaType>,
    pub title: Option<String>,
    pub poster_path: FieldUpdate<String>,
    pub backdrop_path: FieldUpdate<String>,
    pub release_date: FieldUpdate<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    pub status: Option<WatchStatus>,
    pub rating: FieldUpdate<Rating>,
    pub notes: FieldUpdate<String>,
    pub watched_at: FieldUpdate<DateTime<Utc>>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: WatchStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn rating(mut self, rating: Rating) -> Self {
        self.rating = FieldUpdate::Set(rating);
        self
    }

    pub fn clear_rating(mut self) -> Self {
        self.rating = FieldUpdate::Clear;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = FieldUpdate::Set(notes.into());
        self
    }

    pub fn clear_notes(mut self) -> Self {
        self.notes = FieldUpdate::Clear;
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge onto `entry`. Status handling beyond plain assignment lives in the store.
    pub fn apply_to(self, entry: &mut WatchlistEntry) {
        if let Some(catalog_id) = self.catalog_id {
            entry.catalog_id = catalog_id;
        }
        if let Some(media_type) = self.media_type {
            entry.media_type = media_type;
        }
        if let Some(title) = self.title {
            entry.title = title;
        }
        self.poster_path.apply(&mut entry.poster_path);
        self.backdrop_path.apply(&mut entry.backdrop_path);
        self.release_date.apply(&mut entry.release_date);
        if let Some(vote_average) = self.vote_average {
            entry.vote_average = vote_average;
        }
        if let Some(overview) = self.overview {
            entry.overview = overview;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        self.rating.apply(&mut entry.rating);
        self.notes.apply(&mut entry.notes);
        self.watched_at.apply(&mut entry.watched_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watchlist::{EntryId, NewEntry};

    fn entry() -> WatchlistEntry {
        NewEntry {
            catalog_id: 550,
            media_type: MediaType::Movie,
            title: "Fight Club".to_string(),
            poster_path: Some("/a.jpg".to_string()),
            backdrop_path: None,
            release_date: Some("1999-10-15".to_string()),
            vote_average: 8.4,
            overview: String::new(),
            status: WatchStatus::WantToWatch,
            rating: None,
            notes: Some("recommended by a friend".to_string()),
        }
        .into_entry(EntryId::new("movie_550_0_0"), Utc::now())
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut e = entry();
        let before = e.clone();
        assert!(EntryPatch::new().is_empty());
        EntryPatch::new().apply_to(&mut e);
        assert_eq!(e, before);
    }

    #[test]
    fn test_patch_sets_and_clears() {
        let mut e = entry();
        EntryPatch::new()
            .rating(Rating::new(9).unwrap())
            .clear_notes()
            .status(WatchStatus::Watching)
            .apply_to(&mut e);
        assert_eq!(e.rating.map(|r| r.value()), Some(9));
        assert_eq!(e.notes, None);
        assert_eq!(e.status, WatchStatus::Watching);
        assert_eq!(e.poster_path.as_deref(), Some("/a.jpg"));
    }

    #[test]
    fn test_field_update_from_option() {
        assert_eq!(FieldUpdate::from_option(Some(3)), FieldUpdate::Set(3));
        assert_eq!(FieldUpdate::<u8>::from_option(None), FieldUpdate::Clear);
        assert!(FieldUpdate::<u8>::default().is_keep());
    }
}
