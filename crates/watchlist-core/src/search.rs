use catalog_sources::{CatalogSource, RemoteError};
use tracing::{debug, warn};
use watchlist_config::BrowseOptions;
use watchlist_models::{CatalogItem, MediaType};

use crate::browse::{truncate, SEARCH_LIMIT};
use crate::recency::{RequestTicket, RequestTracker};

/// State of an interactive search box.
///
/// Each query gets a ticket from [`SearchSession::begin`]; its response is
/// only shown if no later query has been started since.
#[derive(Debug)]
pub struct SearchSession {
    tracker: RequestTracker,
    query: String,
    media_type: Option<MediaType>,
    limit: usize,
    results: Vec<CatalogItem>,
    last_error: Option<RemoteError>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SEARCH_LIMIT)
    }
}

impl SearchSession {
    pub fn new(limit: usize) -> Self {
        Self {
            tracker: RequestTracker::new(),
            query: String::new(),
            media_type: None,
            limit,
            results: Vec::new(),
            last_error: None,
        }
    }

    pub fn from_options(options: &BrowseOptions) -> Self {
        Self::new(options.search_limit)
    }

    /// Restrict searches to one media type; `None` searches both
    pub fn with_media_type(mut self, media_type: Option<MediaType>) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type
    }

    pub fn results(&self) -> &[CatalogItem] {
        &self.results
    }

    /// Error of the last applied response, if it failed
    pub fn last_error(&self) -> Option<&RemoteError> {
        self.last_error.as_ref()
    }

    /// Start a query. A blank query clears the results and makes any
    /// in-flight request stale; no request should be sent for it.
    pub fn begin(&mut self, query: &str) -> Option<RequestTicket> {
        self.query = query.to_string();
        if query.trim().is_empty() {
            self.tracker.cancel_outstanding();
            self.results.clear();
            self.last_error = None;
            return None;
        }
        Some(self.tracker.begin())
    }

    /// Deliver a response. Returns false when it was stale and dropped.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        response: Result<Vec<CatalogItem>, RemoteError>,
    ) -> bool {
        if !self.tracker.try_apply(ticket) {
            debug!("Dropping stale search response (request {})", ticket.value());
            return false;
        }

        match response {
            Ok(items) => {
                self.results = truncate(items, self.limit);
                self.last_error = None;
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", self.query, e);
                self.results.clear();
                self.last_error = Some(e);
            }
        }
        true
    }

    /// Run `query` against `source` and apply the response
    pub async fn search(&mut self, source: &dyn CatalogSource, query: &str) -> bool {
        let Some(ticket) = self.begin(query) else {
            return true;
        };
        let response = source.search_typed(query.trim(), self.media_type).await;
        self.complete(ticket, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::fake::{item, items, FakeCatalog};
    use std::time::Duration;

    #[tokio::test]
    async fn test_search_truncates_to_limit() {
        let source = FakeCatalog::default().with_search(
            "star",
            Duration::ZERO,
            items(MediaType::Movie, 30),
        );
        let mut session = SearchSession::default();

        assert!(session.search(&source, "star").await);
        assert_eq!(session.results().len(), SEARCH_LIMIT);
        assert_eq!(session.results()[0].catalog_id, 1);
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_out_of_order_responses_keep_latest() {
        let source = FakeCatalog::default()
            .with_search("fi", Duration::from_millis(50), vec![item(1, MediaType::Movie, "Fig")])
            .with_search("fight", Duration::ZERO, vec![item(550, MediaType::Movie, "Fight Club")]);
        let mut session = SearchSession::default();

        let older = session.begin("fi").unwrap();
        let newer = session.begin("fight").unwrap();
        let (old_response, new_response) =
            futures::join!(source.search("fi"), source.search("fight"));

        // the newer request finishes first
        assert!(session.complete(newer, new_response));
        assert!(!session.complete(older, old_response));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].title, "Fight Club");
        assert_eq!(session.query(), "fight");
    }

    #[tokio::test]
    async fn test_superseded_response_arriving_first_is_dropped() {
        let source = FakeCatalog::default()
            .with_search("fi", Duration::ZERO, vec![item(1, MediaType::Movie, "Fig")])
            .with_search("fight", Duration::from_millis(20), vec![item(550, MediaType::Movie, "Fight Club")]);
        let mut session = SearchSession::default();

        let older = session.begin("fi").unwrap();
        let newer = session.begin("fight").unwrap();
        let (old_response, new_response) =
            futures::join!(source.search("fi"), source.search("fight"));

        assert!(!session.complete(older, old_response));
        assert!(session.results().is_empty());
        assert_eq!(session.query(), "fight");

        assert!(session.complete(newer, new_response));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].title, "Fight Club");
    }

    #[tokio::test]
    async fn test_empty_query_clears_and_cancels() {
        let source = FakeCatalog::default()
            .with_search("fight", Duration::ZERO, vec![item(550, MediaType::Movie, "Fight Club")]);
        let mut session = SearchSession::default();
        session.search(&source, "fight").await;
        assert_eq!(session.results().len(), 1);

        let pending = session.begin("fig").unwrap();
        assert!(session.begin("   ").is_none());
        assert!(session.results().is_empty());

        let late = source.search("fight").await;
        assert!(!session.complete(pending, late));
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_sends_no_request() {
        let source = FakeCatalog::default();
        let mut session = SearchSession::default();
        assert!(session.search(&source, "").await);
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        let source = FakeCatalog::default();
        let mut session = SearchSession::new(5);
        assert!(session.search(&source, "nothing registered").await);
        assert!(session.results().is_empty());
        assert!(matches!(
            session.last_error(),
            Some(RemoteError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_media_type_filter() {
        let mixed = vec![
            item(550, MediaType::Movie, "Fight Club"),
            item(1399, MediaType::Show, "Game of Thrones"),
        ];
        let source = FakeCatalog::default().with_search("g", Duration::ZERO, mixed);
        let mut session = SearchSession::default().with_media_type(Some(MediaType::Show));

        session.search(&source, "g").await;
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].catalog_id, 1399);
    }

    #[test]
    fn test_from_options() {
        let options = BrowseOptions {
            trending_limit: 8,
            search_limit: 3,
        };
        let session = SearchSession::from_options(&options);
        assert_eq!(session.limit, 3);
    }
}
