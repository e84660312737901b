pub mod browse;
pub mod error;
pub mod id;
pub mod recency;
pub mod search;
pub mod storage;
pub mod store;
pub mod views;

pub use browse::{load_category, load_trending, truncate, TrendingCatalog, SEARCH_LIMIT, TRENDING_LIMIT};
pub use error::PersistenceError;
pub use id::EntryIdGenerator;
pub use recency::{RequestTicket, RequestTracker};
pub use search::SearchSession;
pub use storage::{JsonFileStorage, MemoryStorage, WatchlistStorage, STORAGE_VERSION};
pub use store::{Committed, SubscriptionId, ToggleOutcome, WatchlistStore};
pub use views::{decorate, group_by_status, Decorated, StatusCounts};
