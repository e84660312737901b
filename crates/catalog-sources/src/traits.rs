use async_trait::async_trait;
use watchlist_models::{CatalogItem, CatalogKey, Genre, MediaType};

use crate::error::RemoteError;
use crate::query::{CatalogCategory, DiscoverFilters};

/// Read-only query surface of a remote media catalog.
///
/// Results come back in the catalog's own order and are not truncated here;
/// how many to keep is the consumer's decision.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Mixed movie/show search
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, RemoteError>;
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogItem>, RemoteError>;
    async fn search_shows(&self, query: &str) -> Result<Vec<CatalogItem>, RemoteError>;

    /// Search restricted to one media type, or mixed when `None`
    async fn search_typed(
        &self,
        query: &str,
        media_type: Option<MediaType>,
    ) -> Result<Vec<CatalogItem>, RemoteError> {
        match media_type {
            Some(MediaType::Movie) => self.search_movies(query).await,
            Some(MediaType::Show) => self.search_shows(query).await,
            None => self.search(query).await,
        }
    }

    async fn list_by_category(
        &self,
        media_type: MediaType,
        category: CatalogCategory,
    ) -> Result<Vec<CatalogItem>, RemoteError>;

    async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, RemoteError>;

    async fn details(&self, key: CatalogKey) -> Result<CatalogItem, RemoteError>;

    async fn discover(
        &self,
        media_type: MediaType,
        filters: &DiscoverFilters,
    ) -> Result<Vec<CatalogItem>, RemoteError>;
}
