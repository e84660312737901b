use catalog_sources::{CatalogCategory, CatalogSource};
use tracing::{debug, warn};
use watchlist_models::{CatalogItem, MediaType};

/// Items shown per media type on the trending view
pub const TRENDING_LIMIT: usize = 8;
/// Items kept from a search
pub const SEARCH_LIMIT: usize = 20;

/// Keep the first `limit` items in their remote order
pub fn truncate(mut items: Vec<CatalogItem>, limit: usize) -> Vec<CatalogItem> {
    items.truncate(limit);
    items
}

/// Movies and shows for the landing view, each list independently loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendingCatalog {
    pub movies: Vec<CatalogItem>,
    pub shows: Vec<CatalogItem>,
}

impl TrendingCatalog {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.shows.is_empty()
    }
}

/// Fetch one category list. Remote failures degrade to an empty list.
pub async fn load_category(
    source: &dyn CatalogSource,
    media_type: MediaType,
    category: CatalogCategory,
    limit: usize,
) -> Vec<CatalogItem> {
    match source.list_by_category(media_type, category).await {
        Ok(items) => {
            debug!(
                "{} returned {} {} {} items",
                source.source_name(),
                items.len(),
                category,
                media_type
            );
            truncate(items, limit)
        }
        Err(e) => {
            warn!(
                "Failed to load {} {} from {}: {}",
                category,
                media_type,
                source.source_name(),
                e
            );
            Vec::new()
        }
    }
}

/// Trending movies and shows fetched concurrently; one side failing leaves the other intact
pub async fn load_trending(source: &dyn CatalogSource, limit: usize) -> TrendingCatalog {
    let (movies, shows) = futures::join!(
        load_category(source, MediaType::Movie, CatalogCategory::Trending, limit),
        load_category(source, MediaType::Show, CatalogCategory::Trending, limit),
    );
    TrendingCatalog { movies, shows }
}


#[cfg(test)]
mod tests {
    use super::fake::{items, FakeCatalog};
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate(items(MediaType::Movie, 30), SEARCH_LIMIT).len(), 20);
        let short = truncate(items(MediaType::Movie, 3), TRENDING_LIMIT);
        assert_eq!(short.len(), 3);
        assert_eq!(short[0].catalog_id, 1);
    }

    #[tokio::test]
    async fn test_trending_truncates_each_list() {
        let source = FakeCatalog::default()
            .with_list(MediaType::Movie, items(MediaType::Movie, 20))
            .with_list(MediaType::Show, items(MediaType::Show, 20));

        let trending = load_trending(&source, TRENDING_LIMIT).await;
        assert_eq!(trending.movies.len(), 8);
        assert_eq!(trending.shows.len(), 8);
        let ids: Vec<u64> = trending.movies.iter().map(|i| i.catalog_id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_trending_failure_is_independent() {
        let source = FakeCatalog::default().with_list(MediaType::Show, items(MediaType::Show, 3));

        let trending = load_trending(&source, TRENDING_LIMIT).await;
        assert!(trending.movies.is_empty());
        assert_eq!(trending.shows.len(), 3);
        assert!(!trending.is_empty());
    }

    #[tokio::test]
    async fn test_category_failure_degrades_to_empty() {
        let source = FakeCatalog::default();
        let list = load_category(&source, MediaType::Movie, CatalogCategory::TopRated, 8).await;
        assert!(list.is_empty());
    }
}
