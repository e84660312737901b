use super::{prompts, report_remote_failure, resolve_target, settle, AppContext};
use crate::output::{self, Output};
use crate::ui::Spinner;
use catalog_sources::{CatalogSource, ImageKind};
use color_eyre::Result;
use serde_json::json;
use watchlist_core::{group_by_status, StatusCounts, WatchlistStore, WatchlistStorage};
use watchlist_models::{
    CatalogKey, EntryId, EntryPatch, FieldUpdate, MediaType, NewEntry, Rating, WatchStatus,
};

/// Flags of `watchlist edit`
pub struct EditArgs {
    pub rating: Option<u8>,
    pub clear_rating: bool,
    pub notes: Option<String>,
    pub clear_notes: bool,
    pub status: Option<WatchStatus>,
}

impl EditArgs {
    fn into_patch(self) -> Result<EntryPatch> {
        let rating = match (self.rating, self.clear_rating) {
            (Some(value), _) => FieldUpdate::Set(Rating::new(value)?),
            (None, true) => FieldUpdate::Clear,
            (None, false) => FieldUpdate::Keep,
        };
        let notes = match (self.notes, self.clear_notes) {
            (Some(notes), _) => FieldUpdate::Set(notes),
            (None, true) => FieldUpdate::Clear,
            (None, false) => FieldUpdate::Keep,
        };
        Ok(EntryPatch {
            status: self.status,
            rating,
            notes,
            ..EntryPatch::default()
        })
    }
}

fn lookup<S: WatchlistStorage>(store: &WatchlistStore<S>, target: &str, output: &Output) -> Option<EntryId> {
    let id = resolve_target(store, target);
    if id.is_none() {
        output.warn(format!("No watchlist entry matches '{}'", target));
    }
    id
}

pub async fn run_add(
    ctx: &AppContext,
    catalog_id: u64,
    media_type: MediaType,
    status: Option<WatchStatus>,
    output: &Output,
) -> Result<()> {
    let key = CatalogKey::new(catalog_id, media_type);
    let mut store = ctx.open_store();

    if let Some(existing) = store.entry_for(&key) {
        output.warn(format!(
            "'{}' is already on your watchlist ({}, {})",
            existing.title,
            existing.status.label(),
            existing.id
        ));
        return Ok(());
    }

    let catalog = match ctx.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            report_remote_failure("Add", &e, output);
            return Ok(());
        }
    };

    let spinner = Spinner::start(format!("Looking up {}...", key), output.is_human());
    let result = catalog.details(key).await;
    spinner.finish();

    let item = match result {
        Ok(item) => item,
        Err(e) => {
            report_remote_failure(&format!("Add {}", key), &e, output);
            return Ok(());
        }
    };

    let entry = NewEntry::from_catalog(&item).with_status(status.unwrap_or_default());
    let id = settle(store.add(entry), output);

    if output.is_human() {
        let year = item.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        output.success(format!("Added '{}'{} to your watchlist as {}", item.title, year, id));
        output.println(format!(
            "  Poster: {}",
            ctx.images().resolve(item.poster_path.as_deref(), ImageKind::Poster)
        ));
    } else {
        output.json(&json!({ "type": "added", "entry": store.get(&id) }));
    }
    Ok(())
}

pub fn run_remove(ctx: &AppContext, target: &str, output: &Output) -> Result<()> {
    let mut store = ctx.open_store();
    let Some(id) = lookup(&store, target, output) else {
        return Ok(());
    };
    let title = store.get(&id).map(|e| e.title.clone()).unwrap_or_default();

    if settle(store.remove(&id), output) {
        output.success(format!("Removed '{}' from your watchlist", title));
    }
    Ok(())
}

pub fn run_edit(ctx: &AppContext, target: &str, edit: EditArgs, output: &Output) -> Result<()> {
    let patch = edit.into_patch()?;
    if patch.is_empty() {
        output.warn("Nothing to change. Use --rating, --clear-rating, --notes, --clear-notes, or --status");
        return Ok(());
    }

    let mut store = ctx.open_store();
    let Some(id) = lookup(&store, target, output) else {
        return Ok(());
    };

    if settle(store.update(&id, patch), output) {
        report_entry(&store, &id, "Updated", output);
    }
    Ok(())
}

pub fn run_status(ctx: &AppContext, target: &str, status: WatchStatus, output: &Output) -> Result<()> {
    let mut store = ctx.open_store();
    let Some(id) = lookup(&store, target, output) else {
        return Ok(());
    };

    if settle(store.set_status(&id, status), output) {
        report_entry(&store, &id, "Status changed", output);
    }
    Ok(())
}

pub fn run_watched(ctx: &AppContext, target: &str, rating: Option<u8>, output: &Output) -> Result<()> {
    let rating = rating.map(Rating::new).transpose()?;
    let mut store = ctx.open_store();
    let Some(id) = lookup(&store, target, output) else {
        return Ok(());
    };

    if settle(store.mark_watched(&id, rating), output) {
        report_entry(&store, &id, "Marked as watched", output);
    }
    Ok(())
}

fn report_entry<S: WatchlistStorage>(store: &WatchlistStore<S>, id: &EntryId, action: &str, output: &Output) {
    let Some(entry) = store.get(id) else {
        return;
    };
    if output.is_human() {
        let rating = entry.rating.map(|r| format!(", rated {}", r)).unwrap_or_default();
        output.success(format!("{}: '{}' is {}{}", action, entry.title, entry.status.label(), rating));
    } else {
        output.json(&json!({ "type": "updated", "entry": entry }));
    }
}

pub fn run_list(ctx: &AppContext, status: Option<WatchStatus>, grouped: bool, output: &Output) -> Result<()> {
    let store = ctx.open_store();

    if !output.is_human() {
        let entries = store.filtered_by(status);
        output.json(&json!({ "status": status, "count": entries.len(), "items": entries }));
        return Ok(());
    }

    if store.is_empty() {
        output.empty_state("Your watchlist is empty. Find something with 'watchlist search' or 'watchlist browse'.");
        return Ok(());
    }

    if grouped {
        for (status, entries) in group_by_status(store.entries()) {
            output::section_header(&format!("{} ({})", status.label(), entries.len()), output);
            output.println(output::entries_table(&entries).to_string());
        }
        return Ok(());
    }

    let entries = store.filtered_by(status);
    if entries.is_empty() {
        let label = status.map(|s| s.label()).unwrap_or("any status");
        output.empty_state(format!("No entries with status {}", label));
        return Ok(());
    }
    output.println(output::entries_table(&entries).to_string());
    Ok(())
}

pub fn run_stats(ctx: &AppContext, output: &Output) -> Result<()> {
    let store = ctx.open_store();
    let counts = StatusCounts::from_entries(store.entries());

    if output.is_human() {
        output::section_header("Watchlist", output);
        output.println(output::stats_table(&counts).to_string());
    } else {
        output.json(&json!({
            "all": counts.all,
            "want_to_watch": counts.want_to_watch,
            "watching": counts.watching,
            "watched": counts.watched,
        }));
    }
    Ok(())
}

pub fn run_clear(ctx: &AppContext, yes: bool, output: &Output) -> Result<()> {
    let mut store = ctx.open_store();
    if store.is_empty() {
        output.info("Watchlist is already empty");
        return Ok(());
    }

    if !yes {
        let prompt = format!("Remove all {} entries from your watchlist?", store.len());
        if !prompts::prompt_yes_no_with_output(&prompt, Some(false), Some(output))? {
            output.info("Nothing removed");
            return Ok(());
        }
    }

    let removed = settle(store.clear(), output);
    output.success(format!("Removed {} entries", removed));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> EditArgs {
        EditArgs {
            rating: None,
            clear_rating: false,
            notes: None,
            clear_notes: false,
            status: None,
        }
    }

    #[test]
    fn test_edit_args_into_patch() {
        let patch = EditArgs {
            rating: Some(9),
            notes: Some("great".to_string()),
            ..args()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.rating, FieldUpdate::Set(Rating::new(9).unwrap()));
        assert_eq!(patch.notes, FieldUpdate::Set("great".to_string()));
        assert_eq!(patch.status, None);

        let clearing = EditArgs { clear_notes: true, ..args() }.into_patch().unwrap();
        assert_eq!(clearing.notes, FieldUpdate::Clear);
        assert!(clearing.rating.is_keep());
    }

    #[test]
    fn test_edit_args_rejects_bad_rating() {
        assert!(EditArgs { rating: Some(11), ..args() }.into_patch().is_err());
    }

    #[test]
    fn test_empty_edit() {
        assert!(args().into_patch().unwrap().is_empty());
    }
}
