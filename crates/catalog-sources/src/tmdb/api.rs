use serde::Deserialize;
use tracing::debug;
use watchlist_models::{CatalogItem, Genre, MediaType};

/// Paged list envelope used by every list endpoint
#[derive(Debug, Deserialize)]
pub struct TmdbPage<T> {
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenreList {
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    // Detail responses carry full genre objects instead of ids
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Deserialize)]
pub struct TmdbShow {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub popularity: f64,
}

/// Multi-search result; `media_type` may also be "person"
#[derive(Debug, Deserialize)]
pub struct TmdbMultiResult {
    pub id: u64,
    pub media_type: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f64,
}

/// The catalog sends "" for unknown dates and artwork
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn genre_ids(ids: Vec<u64>, genres: Vec<TmdbGenre>) -> Vec<u64> {
    if ids.is_empty() {
        genres.into_iter().map(|g| g.id).collect()
    } else {
        ids
    }
}

impl From<TmdbMovie> for CatalogItem {
    fn from(movie: TmdbMovie) -> Self {
        CatalogItem {
            catalog_id: movie.id,
            media_type: MediaType::Movie,
            title: movie.title,
            poster_path: non_empty(movie.poster_path),
            backdrop_path: non_empty(movie.backdrop_path),
            release_date: non_empty(movie.release_date),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            overview: movie.overview.unwrap_or_default(),
            genre_ids: genre_ids(movie.genre_ids, movie.genres),
            popularity: movie.popularity,
        }
    }
}

impl From<TmdbShow> for CatalogItem {
    fn from(show: TmdbShow) -> Self {
        CatalogItem {
            catalog_id: show.id,
            media_type: MediaType::Show,
            title: show.name,
            poster_path: non_empty(show.poster_path),
            backdrop_path: non_empty(show.backdrop_path),
            release_date: non_empty(show.first_air_date),
            vote_average: show.vote_average,
            vote_count: show.vote_count,
            overview: show.overview.unwrap_or_default(),
            genre_ids: genre_ids(show.genre_ids, show.genres),
            popularity: show.popularity,
        }
    }
}

impl From<TmdbGenre> for Genre {
    fn from(genre: TmdbGenre) -> Self {
        Genre {
            id: genre.id,
            name: genre.name,
        }
    }
}

impl TmdbMultiResult {
    /// Convert to a catalog item, dropping anything that is not a movie or show
    pub fn into_catalog_item(self) -> Option<CatalogItem> {
        let (media_type, title, release_date) = match self.media_type.as_str() {
            "movie" => (MediaType::Movie, self.title, self.release_date),
            "tv" => (MediaType::Show, self.name, self.first_air_date),
            other => {
                debug!("Skipping multi-search result {} with media_type {}", self.id, other);
                return None;
            }
        };

        Some(CatalogItem {
            catalog_id: self.id,
            media_type,
            title: title.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            release_date: non_empty(release_date),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            overview: self.overview.unwrap_or_default(),
            genre_ids: self.genre_ids,
            popularity: self.popularity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_page() {
        let body = r#"{
            "page": 1,
            "results": [{
                "id": 550,
                "title": "Fight Club",
                "overview": "An insomniac office worker...",
                "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                "backdrop_path": null,
                "release_date": "1999-10-15",
                "vote_average": 8.4,
                "vote_count": 26280,
                "genre_ids": [18],
                "adult": false,
                "popularity": 61.4
            }],
            "total_pages": 1,
            "total_results": 1
        }"#;
        let page: TmdbPage<TmdbMovie> = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_results, 1);

        let items: Vec<CatalogItem> = page.results.into_iter().map(CatalogItem::from).collect();
        assert_eq!(items[0].catalog_id, 550);
        assert_eq!(items[0].media_type, MediaType::Movie);
        assert_eq!(items[0].release_date.as_deref(), Some("1999-10-15"));
        assert_eq!(items[0].backdrop_path, None);
        assert_eq!(items[0].genre_ids, vec![18]);
    }

    #[test]
    fn test_show_empty_date_becomes_none() {
        let body = r#"{"id": 1399, "name": "Game of Thrones", "first_air_date": "", "poster_path": ""}"#;
        let show: TmdbShow = serde_json::from_str(body).unwrap();
        let item = CatalogItem::from(show);
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.media_type, MediaType::Show);
        assert_eq!(item.release_date, None);
        assert_eq!(item.poster_path, None);
    }

    #[test]
    fn test_null_overview_keeps_page() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "overview": null},
                {"id": 551, "title": "The Poseidon Adventure", "overview": "A ship capsizes."}
            ]
        }"#;
        let page: TmdbPage<TmdbMovie> = serde_json::from_str(body).unwrap();
        let items: Vec<CatalogItem> = page.results.into_iter().map(CatalogItem::from).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].overview, "");
        assert_eq!(items[1].overview, "A ship capsizes.");

        let multi = r#"{"id": 1399, "media_type": "tv", "name": "Game of Thrones", "overview": null}"#;
        let result: TmdbMultiResult = serde_json::from_str(multi).unwrap();
        assert_eq!(result.into_catalog_item().unwrap().overview, "");
    }

    #[test]
    fn test_detail_genres_fill_genre_ids() {
        let body = r#"{"id": 550, "title": "Fight Club", "genres": [{"id": 18, "name": "Drama"}]}"#;
        let movie: TmdbMovie = serde_json::from_str(body).unwrap();
        assert_eq!(CatalogItem::from(movie).genre_ids, vec![18]);
    }

    #[test]
    fn test_multi_search_skips_people() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 550, "media_type": "movie", "title": "Fight Club", "release_date": "1999-10-15"},
                {"id": 287, "media_type": "person", "name": "Brad Pitt"},
                {"id": 1399, "media_type": "tv", "name": "Game of Thrones", "first_air_date": "2011-04-17"}
            ]
        }"#;
        let page: TmdbPage<TmdbMultiResult> = serde_json::from_str(body).unwrap();
        let items: Vec<CatalogItem> = page
            .results
            .into_iter()
            .filter_map(TmdbMultiResult::into_catalog_item)
            .collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Fight Club");
        assert_eq!(items[1].title, "Game of Thrones");
        assert_eq!(items[1].release_date.as_deref(), Some("2011-04-17"));
    }
}
