use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use watchlist_config::TmdbConfig;
use watchlist_models::{CatalogItem, CatalogKey, Genre, MediaType};

use crate::error::RemoteError;
use crate::query::{CatalogCategory, DiscoverFilters};
use crate::tmdb::api::{TmdbGenreList, TmdbMovie, TmdbMultiResult, TmdbPage, TmdbShow};
use crate::traits::CatalogSource;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(api_key, base_url, Duration::from_secs(10))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RemoteError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("watchlist/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            language: None,
        })
    }

    pub fn from_config(config: &TmdbConfig, api_key: Option<String>) -> Result<Self, RemoteError> {
        let api_key = api_key.ok_or(RemoteError::MissingApiKey)?;
        let client = Self::with_timeout(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(client.with_language(config.language.clone()))
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Full request URL; credentials and language ride along as query parameters
    pub fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, RemoteError> {
        let mut query: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        if let Some(ref language) = self.language {
            query.push(("language", language.as_str()));
        }
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let raw = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&raw, &query).map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, RemoteError> {
        let url = self.build_url(path, params)?;
        debug!("GET {}{}", self.base_url, path);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Catalog request {} failed: {}", path, status);
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn movie_page(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<CatalogItem>, RemoteError> {
        let page: TmdbPage<TmdbMovie> = self.get_json(path, params).await?;
        debug!(
            "{}: page {} of {} ({} results total)",
            path, page.page, page.total_pages, page.total_results
        );
        Ok(page.results.into_iter().map(CatalogItem::from).collect())
    }

    async fn show_page(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<CatalogItem>, RemoteError> {
        let page: TmdbPage<TmdbShow> = self.get_json(path, params).await?;
        debug!(
            "{}: page {} of {} ({} results total)",
            path, page.page, page.total_pages, page.total_results
        );
        Ok(page.results.into_iter().map(CatalogItem::from).collect())
    }

    async fn typed_page(
        &self,
        media_type: MediaType,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<CatalogItem>, RemoteError> {
        match media_type {
            MediaType::Movie => self.movie_page(path, params).await,
            MediaType::Show => self.show_page(path, params).await,
        }
    }
}

fn search_params(query: &str) -> Vec<(&'static str, String)> {
    vec![("query", query.to_string()), ("page", "1".to_string())]
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, RemoteError> {
        let page: TmdbPage<TmdbMultiResult> = self.get_json("/search/multi", &search_params(query)).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(TmdbMultiResult::into_catalog_item)
            .collect())
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogItem>, RemoteError> {
        self.movie_page("/search/movie", &search_params(query)).await
    }

    async fn search_shows(&self, query: &str) -> Result<Vec<CatalogItem>, RemoteError> {
        self.show_page("/search/tv", &search_params(query)).await
    }

    async fn list_by_category(
        &self,
        media_type: MediaType,
        category: CatalogCategory,
    ) -> Result<Vec<CatalogItem>, RemoteError> {
        self.typed_page(media_type, &category.path(media_type), &[]).await
    }

    async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, RemoteError> {
        let list: TmdbGenreList = self
            .get_json(&format!("/genre/{}/list", media_type.as_str()), &[])
            .await?;
        Ok(list.genres.into_iter().map(Genre::from).collect())
    }

    async fn details(&self, key: CatalogKey) -> Result<CatalogItem, RemoteError> {
        let path = format!("/{}/{}", key.media_type.as_str(), key.catalog_id);
        match key.media_type {
            MediaType::Movie => Ok(self.get_json::<TmdbMovie>(&path, &[]).await?.into()),
            MediaType::Show => Ok(self.get_json::<TmdbShow>(&path, &[]).await?.into()),
        }
    }

    async fn discover(
        &self,
        media_type: MediaType,
        filters: &DiscoverFilters,
    ) -> Result<Vec<CatalogItem>, RemoteError> {
        let path = format!("/discover/{}", media_type.as_str());
        self.typed_page(media_type, &path, &filters.to_params(media_type)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and hand back the raw request
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_missing_api_key() {
        assert_eq!(
            TmdbClient::new("", "https://api.themoviedb.org/3").err(),
            Some(RemoteError::MissingApiKey)
        );
        assert_eq!(
            TmdbClient::from_config(&TmdbConfig::default(), None).err(),
            Some(RemoteError::MissingApiKey)
        );
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let client = TmdbClient::new("secret", "https://api.themoviedb.org/3/")
            .unwrap()
            .with_language(Some("en-US".to_string()));
        let url = client
            .build_url("/search/movie", &search_params("fight club"))
            .unwrap();
        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("api_key".to_string(), "secret".to_string()),
                ("language".to_string(), "en-US".to_string()),
                ("query".to_string(), "fight club".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_by_category_parses_envelope() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"page":1,"results":[{"id":550,"title":"Fight Club","release_date":"1999-10-15","vote_average":8.4}],"total_pages":1,"total_results":1}"#,
        )
        .await;
        let client = TmdbClient::new("secret", base).unwrap();

        let items = client
            .list_by_category(MediaType::Movie, CatalogCategory::Popular)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key(), CatalogKey::movie(550));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /movie/popular?api_key=secret"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let (base, server) = serve_once(
            "401 Unauthorized",
            r#"{"status_code":7,"status_message":"Invalid API key"}"#,
        )
        .await;
        let client = TmdbClient::new("wrong", base).unwrap();

        let err = client.search("fight club").await.unwrap_err();
        match err {
            RemoteError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (base, server) = serve_once("200 OK", r#"{"unexpected": true}"#).await;
        let client = TmdbClient::new("secret", base).unwrap();

        let err = client.genres(MediaType::Show).await.unwrap_err();
        assert!(matches!(err, RemoteError::Decode(_)));
        server.await.unwrap();
    }
}
