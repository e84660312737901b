use chrono::Utc;
use std::fmt;
use tracing::{debug, info, warn};
use watchlist_models::{
    CatalogItem, CatalogKey, EntryId, EntryPatch, NewEntry, Rating, WatchStatus,
    WatchlistEntry,
};

use crate::error::PersistenceError;
use crate::id::EntryIdGenerator;
use crate::storage::WatchlistStorage;

/// Result of a mutation: the in-memory change has happened, the durable write may not have
#[must_use = "a mutation's persistence outcome should be checked or logged"]
#[derive(Debug)]
pub struct Committed<T> {
    value: T,
    persisted: Result<(), PersistenceError>,
}

impl<T> Committed<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn persistence_error(&self) -> Option<&PersistenceError> {
        self.persisted.as_ref().err()
    }

    pub fn into_parts(self) -> (T, Result<(), PersistenceError>) {
        (self.value, self.persisted)
    }

    pub fn into_result(self) -> Result<T, PersistenceError> {
        self.persisted.map(|_| self.value)
    }

    /// Surface a failed write as a warning and keep going with the value
    pub fn logged(self) -> T {
        if let Err(ref e) = self.persisted {
            warn!("Watchlist change kept in memory but not saved: {}", e);
        }
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(EntryId),
    Removed(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&[WatchlistEntry])>;

/// Authoritative in-memory watchlist with a durable mirror.
///
/// Every mutation rewrites the whole collection to storage before returning.
/// A failed write is reported through [`Committed`] and never undoes the change.
pub struct WatchlistStore<S: WatchlistStorage> {
    items: Vec<WatchlistEntry>,
    storage: S,
    ids: EntryIdGenerator,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: WatchlistStorage> fmt::Debug for WatchlistStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchlistStore")
            .field("items", &self.items.len())
            .field("storage", &self.storage.describe())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<S: WatchlistStorage> WatchlistStore<S> {
    /// Restore from storage. Missing, corrupt, or incompatible records start an empty store.
    pub fn open(storage: S) -> Self {
        let items = match storage.load() {
            Ok(Some(items)) => dedupe_ids(items),
            Ok(None) => {
                debug!("No stored watchlist in {}, starting empty", storage.describe());
                Vec::new()
            }
            Err(e) => {
                warn!(
                    "Could not restore watchlist from {}: {}. Starting with an empty watchlist.",
                    storage.describe(),
                    e
                );
                Vec::new()
            }
        };

        Self {
            items,
            storage,
            ids: EntryIdGenerator::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&WatchlistEntry> {
        self.items.iter().find(|e| &e.id == id)
    }

    /// First entry in collection order with this natural key
    pub fn entry_for(&self, key: &CatalogKey) -> Option<&WatchlistEntry> {
        self.items.iter().find(|e| e.matches(key))
    }

    pub fn find_by_catalog_key(&self, key: &CatalogKey) -> Option<&EntryId> {
        self.entry_for(key).map(|e| &e.id)
    }

    pub fn is_member(&self, key: &CatalogKey) -> bool {
        self.find_by_catalog_key(key).is_some()
    }

    /// Entries with `status` (all when `None`), in collection order
    pub fn filtered_by(&self, status: Option<WatchStatus>) -> Vec<&WatchlistEntry> {
        self.items
            .iter()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .collect()
    }

    /// Append a new entry. Duplicate natural keys are not rejected here.
    pub fn add(&mut self, item: NewEntry) -> Committed<EntryId> {
        let now = Utc::now();
        let key = item.key();
        let items = &self.items;
        let id = self
            .ids
            .next_id(&key, now, |candidate| items.iter().any(|e| e.id.as_str() == candidate));

        let mut entry = item.into_entry(id.clone(), now);
        if entry.status == WatchStatus::Watched {
            entry.watched_at = Some(now);
        }

        debug!("Adding {} ({}) as {}", entry.title, key, id);
        self.items.push(entry);
        self.commit(id, true)
    }

    /// Remove by id; absent ids are a no-op
    pub fn remove(&mut self, id: &EntryId) -> Committed<bool> {
        let before = self.items.len();
        self.items.retain(|e| &e.id != id);
        let removed = self.items.len() != before;
        if !removed {
            debug!("remove: no watchlist entry {}", id);
        }
        self.commit(removed, removed)
    }

    /// Shallow merge of `patch` onto the entry. A transition into `Watched`
    /// stamps `watched_at` unless the patch sets it explicitly; a watched
    /// entry is never left without one.
    pub fn update(&mut self, id: &EntryId, patch: EntryPatch) -> Committed<bool> {
        let Some(index) = self.position(id) else {
            debug!("update: no watchlist entry {}", id);
            return self.commit(false, false);
        };
        let entry = &mut self.items[index];

        let was_watched = entry.status == WatchStatus::Watched;
        let stamp_watched = patch.status == Some(WatchStatus::Watched)
            && !was_watched
            && patch.watched_at.is_keep();

        patch.apply_to(entry);
        let watched_without_time =
            entry.status == WatchStatus::Watched && entry.watched_at.is_none();
        if stamp_watched || watched_without_time {
            entry.watched_at = Some(Utc::now());
        }
        self.commit(true, true)
    }

    /// Mark watched now; a given rating replaces the current one, `None` keeps it
    pub fn mark_watched(&mut self, id: &EntryId, rating: Option<Rating>) -> Committed<bool> {
        let Some(index) = self.position(id) else {
            debug!("mark_watched: no watchlist entry {}", id);
            return self.commit(false, false);
        };
        let entry = &mut self.items[index];

        entry.status = WatchStatus::Watched;
        entry.watched_at = Some(Utc::now());
        if let Some(rating) = rating {
            entry.rating = Some(rating);
        }
        self.commit(true, true)
    }

    /// Status change as made from a status picker; `Watched` goes through `mark_watched`
    pub fn set_status(&mut self, id: &EntryId, status: WatchStatus) -> Committed<bool> {
        match status {
            WatchStatus::Watched => self.mark_watched(id, None),
            other => self.update(id, EntryPatch::new().status(other)),
        }
    }

    /// Remove the catalog item's entry if present, otherwise add it
    pub fn toggle(&mut self, item: &CatalogItem) -> Committed<ToggleOutcome> {
        match self.find_by_catalog_key(&item.key()).cloned() {
            Some(id) => {
                let (_, persisted) = self.remove(&id).into_parts();
                Committed {
                    value: ToggleOutcome::Removed(id),
                    persisted,
                }
            }
            None => {
                let (id, persisted) = self.add(NewEntry::from_catalog(item)).into_parts();
                Committed {
                    value: ToggleOutcome::Added(id),
                    persisted,
                }
            }
        }
    }

    /// Empty the collection; returns how many entries were dropped
    pub fn clear(&mut self) -> Committed<usize> {
        let removed = self.items.len();
        self.items.clear();
        info!("Cleared {} watchlist entries", removed);
        self.commit(removed, removed > 0)
    }

    /// Register a callback invoked with the full collection after each change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&[WatchlistEntry]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.items.iter().position(|e| &e.id == id)
    }

    fn commit<T>(&mut self, value: T, changed: bool) -> Committed<T> {
        let persisted = self.storage.save(&self.items);
        if let Err(ref e) = persisted {
            debug!("Persisting watchlist to {} failed: {}", self.storage.describe(), e);
        }
        if changed {
            for (_, subscriber) in self.subscribers.iter_mut() {
                subscriber(&self.items);
            }
        }
        Committed { value, persisted }
    }
}

/// Stored ids must be unique; keep the first of any duplicates
fn dedupe_ids(items: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let mut seen = std::collections::HashSet::new();
    let total = items.len();
    let unique: Vec<WatchlistEntry> = items
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect();
    if unique.len() != total {
        warn!(
            "Dropped {} watchlist entries with duplicate ids while restoring",
            total - unique.len()
        );
    }
    unique
}
