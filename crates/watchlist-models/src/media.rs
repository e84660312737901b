use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv", alias = "show")]
    Show,
}

impl MediaType {
    /// Path segment / tag used by the remote catalog ("movie" or "tv")
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "tv" | "show" | "shows" => Ok(MediaType::Show),
            other => Err(format!("Unknown media type: {}. Use 'movie' or 'tv'", other)),
        }
    }
}

/// Natural key of a catalog item: the remote id plus its media type.
///
/// The remote catalog reuses numeric ids across movies and shows, so the id
/// alone is not enough to identify an item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogKey {
    pub catalog_id: u64,
    pub media_type: MediaType,
}

impl CatalogKey {
    pub fn new(catalog_id: u64, media_type: MediaType) -> Self {
        Self { catalog_id, media_type }
    }

    pub fn movie(catalog_id: u64) -> Self {
        Self::new(catalog_id, MediaType::Movie)
    }

    pub fn show(catalog_id: u64) -> Self {
        Self::new(catalog_id, MediaType::Show)
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.media_type, self.catalog_id)
    }
}

/// A movie or show as returned by the remote catalog. Read-only from the
/// point of view of the watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub catalog_id: u64,
    pub media_type: MediaType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f64,
}

impl CatalogItem {
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.catalog_id, self.media_type)
    }

    /// Release year parsed from the leading `YYYY` of the release date
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(0..4))
            .and_then(|year| year.parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_wire_names() {
        assert_eq!(serde_json::to_string(&MediaType::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaType::Show).unwrap(), "\"tv\"");
        let show: MediaType = serde_json::from_str("\"show\"").unwrap();
        assert_eq!(show, MediaType::Show);
    }

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("Movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("shows".parse::<MediaType>().unwrap(), MediaType::Show);
        assert!("person".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_catalog_item_year() {
        let mut item = CatalogItem {
            catalog_id: 550,
            media_type: MediaType::Movie,
            title: "Fight Club".to_string(),
            poster_path: None,
            backdrop_path: None,
            release_date: Some("1999-10-15".to_string()),
            vote_average: 8.4,
            vote_count: 0,
            overview: String::new(),
            genre_ids: vec![],
            popularity: 0.0,
        };
        assert_eq!(item.year(), Some(1999));
        assert_eq!(item.key(), CatalogKey::movie(550));

        item.release_date = None;
        assert_eq!(item.year(), None);
    }
}
