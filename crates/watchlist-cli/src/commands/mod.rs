use crate::output::Output;
use catalog_sources::{ImageResolver, RemoteError, TmdbClient};
use color_eyre::Result;
use tracing::{debug, warn};
use watchlist_config::{Config, CredentialStore, PathManager};
use watchlist_core::{Committed, JsonFileStorage, WatchlistStorage, WatchlistStore};
use watchlist_models::{CatalogKey, EntryId, MediaType};

pub mod browse;
pub mod config;
pub mod entries;
pub mod prompts;

/// Everything a command needs, loaded once at startup
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid config in {}: {}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        if let Err(e) = credentials.load() {
            warn!("Failed to load credentials from {}: {}", paths.credentials_file().display(), e);
        }

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn open_store(&self) -> WatchlistStore<JsonFileStorage> {
        let file = self.config.watchlist_file(&self.paths);
        debug!("Opening watchlist at {}", file.display());
        WatchlistStore::open(JsonFileStorage::new(file))
    }

    pub fn catalog(&self) -> Result<TmdbClient, RemoteError> {
        TmdbClient::from_config(&self.config.tmdb, self.credentials.resolve_tmdb_api_key())
    }

    pub fn images(&self) -> ImageResolver {
        ImageResolver::new(self.config.tmdb.image_base_url.as_str())
    }
}

/// Report a failed save without failing the command; the change stays applied for this run
pub fn settle<T>(committed: Committed<T>, output: &Output) -> T {
    let (value, persisted) = committed.into_parts();
    if let Err(e) = persisted {
        warn!("Watchlist change not saved: {}", e);
        output.warn(format!("Change applied but could not be saved: {}", e));
    }
    value
}

/// Explain a catalog failure as an empty state, with a hint when configuration is the cause
pub fn report_remote_failure(context: &str, error: &RemoteError, output: &Output) {
    match error {
        RemoteError::MissingApiKey => {
            output.empty_state(format!("{}: no catalog API key configured.", context));
            output.println("Run 'watchlist config tmdb' or set WATCHLIST_TMDB_API_KEY.");
        }
        RemoteError::Status { status: 401, .. } => {
            output.empty_state(format!("{}: the catalog rejected the API key.", context));
            output.println("Run 'watchlist config tmdb' to update it.");
        }
        other => {
            output.empty_state(format!("{}: catalog unavailable ({}).", context, other));
            if let Some(hint) = retry_hint(other) {
                output.println(hint);
            }
        }
    }
}

/// Follow-up advice for failures that may clear on their own
pub fn retry_hint(error: &RemoteError) -> Option<&'static str> {
    error.is_transient().then_some("This looks temporary; try again in a moment.")
}

/// Parse `movie:550` / `tv:1399` into a natural key
pub fn parse_catalog_key(target: &str) -> Option<CatalogKey> {
    let (media, id) = target.split_once(':')?;
    let media_type: MediaType = media.parse().ok()?;
    let catalog_id = id.trim().parse().ok()?;
    Some(CatalogKey::new(catalog_id, media_type))
}

/// Resolve a command-line target, either an entry id or a natural key, to an entry id
pub fn resolve_target<S: WatchlistStorage>(store: &WatchlistStore<S>, target: &str) -> Option<EntryId> {
    let id = EntryId::new(target.trim());
    if store.get(&id).is_some() {
        return Some(id);
    }
    parse_catalog_key(target).and_then(|key| store.find_by_catalog_key(&key).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlist_core::MemoryStorage;
    use watchlist_models::NewEntry;

    fn entry(catalog_id: u64, media_type: MediaType) -> NewEntry {
        NewEntry {
            catalog_id,
            media_type,
            title: "Fight Club".to_string(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: 8.4,
            overview: String::new(),
            status: Default::default(),
            rating: None,
            notes: None,
        }
    }

    #[test]
    fn test_retry_hint_only_for_transient_failures() {
        assert!(retry_hint(&RemoteError::Timeout).is_some());
        assert!(retry_hint(&RemoteError::Status { status: 503, body: String::new() }).is_some());
        assert!(retry_hint(&RemoteError::Status { status: 404, body: String::new() }).is_none());
        assert!(retry_hint(&RemoteError::Decode("bad".to_string())).is_none());
    }

    #[test]
    fn test_parse_catalog_key() {
        assert_eq!(parse_catalog_key("movie:550"), Some(CatalogKey::movie(550)));
        assert_eq!(parse_catalog_key("tv:1399"), Some(CatalogKey::show(1399)));
        assert_eq!(parse_catalog_key("show:1399"), Some(CatalogKey::show(1399)));
        assert_eq!(parse_catalog_key("movie_550_1_0"), None);
        assert_eq!(parse_catalog_key("person:12"), None);
    }

    #[test]
    fn test_resolve_target() {
        let mut store = WatchlistStore::open(MemoryStorage::new());
        let id = store.add(entry(550, MediaType::Movie)).into_result().unwrap();

        assert_eq!(resolve_target(&store, id.as_str()), Some(id.clone()));
        assert_eq!(resolve_target(&store, "movie:550"), Some(id));
        assert_eq!(resolve_target(&store, "tv:550"), None);
        assert_eq!(resolve_target(&store, "nope"), None);
    }
}
