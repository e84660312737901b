use std::collections::BTreeMap;
use watchlist_models::{CatalogItem, WatchStatus, WatchlistEntry};

use crate::storage::WatchlistStorage;
use crate::store::WatchlistStore;

/// Entries grouped by status, collection order kept within each group.
/// Statuses with no entries are left out.
pub fn group_by_status(entries: &[WatchlistEntry]) -> BTreeMap<WatchStatus, Vec<&WatchlistEntry>> {
    let mut groups: BTreeMap<WatchStatus, Vec<&WatchlistEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.status).or_default().push(entry);
    }
    groups
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub want_to_watch: usize,
    pub watching: usize,
    pub watched: usize,
}

impl StatusCounts {
    pub fn from_entries(entries: &[WatchlistEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut counts, entry| {
            counts.all += 1;
            match entry.status {
                WatchStatus::WantToWatch => counts.want_to_watch += 1,
                WatchStatus::Watching => counts.watching += 1,
                WatchStatus::Watched => counts.watched += 1,
            }
            counts
        })
    }

    pub fn count(&self, status: Option<WatchStatus>) -> usize {
        match status {
            None => self.all,
            Some(WatchStatus::WantToWatch) => self.want_to_watch,
            Some(WatchStatus::Watching) => self.watching,
            Some(WatchStatus::Watched) => self.watched,
        }
    }
}

/// A remote result paired with its watchlist entry, if it has one
#[derive(Debug, Clone, Copy)]
pub struct Decorated<'a> {
    pub item: &'a CatalogItem,
    pub entry: Option<&'a WatchlistEntry>,
}

impl Decorated<'_> {
    pub fn is_member(&self) -> bool {
        self.entry.is_some()
    }

    pub fn status(&self) -> Option<WatchStatus> {
        self.entry.map(|e| e.status)
    }
}

/// Annotate remote results with membership, keeping their order
pub fn decorate<'a, S: WatchlistStorage>(
    items: &'a [CatalogItem],
    store: &'a WatchlistStore<S>,
) -> Vec<Decorated<'a>> {
    items
        .iter()
        .map(|item| Decorated {
            item,
            entry: store.entry_for(&item.key()),
        })
        .collect()
}
