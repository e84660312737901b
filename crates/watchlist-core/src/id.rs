use chrono::{DateTime, Utc};
use watchlist_models::{CatalogKey, EntryId};

/// Generates entry ids of the form `{media}_{catalog_id}_{millis}_{seq}`.
///
/// The sequence number keeps ids distinct within one millisecond; candidates
/// already taken (e.g. restored from storage) are skipped.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    seq: u64,
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id<F>(&mut self, key: &CatalogKey, now: DateTime<Utc>, is_taken: F) -> EntryId
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let candidate = format!(
                "{}_{}_{}_{}",
                key.media_type,
                key.catalog_id,
                now.timestamp_millis(),
                self.seq
            );
            self.seq = self.seq.wrapping_add(1);
            if !is_taken(&candidate) {
                return EntryId::new(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_millisecond_ids_are_distinct() {
        let mut ids = EntryIdGenerator::new();
        let now = Utc::now();
        let key = CatalogKey::movie(550);

        let generated: HashSet<EntryId> = (0..100).map(|_| ids.next_id(&key, now, |_| false)).collect();
        assert_eq!(generated.len(), 100);
    }

    #[test]
    fn test_taken_candidates_are_skipped() {
        let mut ids = EntryIdGenerator::new();
        let now = Utc::now();
        let key = CatalogKey::show(1399);
        let taken = format!("tv_1399_{}_0", now.timestamp_millis());

        let id = ids.next_id(&key, now, |candidate| candidate == taken);
        assert_eq!(id.as_str(), format!("tv_1399_{}_1", now.timestamp_millis()));
    }
}
