use std::fmt;
use std::str::FromStr;
use watchlist_models::MediaType;

/// Curated lists offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogCategory {
    Trending,
    Popular,
    TopRated,
    Upcoming,
}

impl CatalogCategory {
    pub const ALL: [CatalogCategory; 4] = [
        CatalogCategory::Trending,
        CatalogCategory::Popular,
        CatalogCategory::TopRated,
        CatalogCategory::Upcoming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogCategory::Trending => "trending",
            CatalogCategory::Popular => "popular",
            CatalogCategory::TopRated => "top_rated",
            CatalogCategory::Upcoming => "upcoming",
        }
    }

    /// Endpoint path for this list. Shows have no "upcoming" list; the closest is "on the air".
    pub fn path(&self, media_type: MediaType) -> String {
        let kind = media_type.as_str();
        match (self, media_type) {
            (CatalogCategory::Trending, _) => format!("/trending/{}/week", kind),
            (CatalogCategory::Popular, _) => format!("/{}/popular", kind),
            (CatalogCategory::TopRated, _) => format!("/{}/top_rated", kind),
            (CatalogCategory::Upcoming, MediaType::Movie) => "/movie/upcoming".to_string(),
            (CatalogCategory::Upcoming, MediaType::Show) => "/tv/on_the_air".to_string(),
        }
    }
}

impl fmt::Display for CatalogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "trending" => Ok(CatalogCategory::Trending),
            "popular" => Ok(CatalogCategory::Popular),
            "top_rated" | "top" => Ok(CatalogCategory::TopRated),
            "upcoming" => Ok(CatalogCategory::Upcoming),
            other => Err(format!(
                "Invalid category: {}. Use 'trending', 'popular', 'top_rated', or 'upcoming'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Popularity,
    VoteAverage,
    ReleaseDate,
}

impl SortBy {
    /// Sort parameter value; the release date field differs between movies and shows
    pub fn param(&self, media_type: MediaType) -> &'static str {
        match (self, media_type) {
            (SortBy::Popularity, _) => "popularity.desc",
            (SortBy::VoteAverage, _) => "vote_average.desc",
            (SortBy::ReleaseDate, MediaType::Movie) => "primary_release_date.desc",
            (SortBy::ReleaseDate, MediaType::Show) => "first_air_date.desc",
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "popularity" => Ok(SortBy::Popularity),
            "vote_average" | "rating" => Ok(SortBy::VoteAverage),
            "release_date" | "date" => Ok(SortBy::ReleaseDate),
            other => Err(format!(
                "Invalid sort: {}. Use 'popularity', 'vote_average', or 'release_date'",
                other
            )),
        }
    }
}

/// Optional narrowing for discover queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverFilters {
    pub genre: Option<u64>,
    pub year: Option<u32>,
    pub sort_by: Option<SortBy>,
}

impl DiscoverFilters {
    pub fn to_params(&self, media_type: MediaType) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(genre) = self.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            let key = match media_type {
                MediaType::Movie => "primary_release_year",
                MediaType::Show => "first_air_date_year",
            };
            params.push((key, year.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.param(media_type).to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_paths() {
        assert_eq!(CatalogCategory::Trending.path(MediaType::Movie), "/trending/movie/week");
        assert_eq!(CatalogCategory::Trending.path(MediaType::Show), "/trending/tv/week");
        assert_eq!(CatalogCategory::TopRated.path(MediaType::Show), "/tv/top_rated");
        assert_eq!(CatalogCategory::Upcoming.path(MediaType::Movie), "/movie/upcoming");
        assert_eq!(CatalogCategory::Upcoming.path(MediaType::Show), "/tv/on_the_air");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("top-rated".parse::<CatalogCategory>().unwrap(), CatalogCategory::TopRated);
        assert!("latest".parse::<CatalogCategory>().is_err());
    }

    #[test]
    fn test_discover_params() {
        let filters = DiscoverFilters {
            genre: Some(18),
            year: Some(1999),
            sort_by: Some(SortBy::ReleaseDate),
        };
        let params = filters.to_params(MediaType::Show);
        assert_eq!(
            params,
            vec![
                ("with_genres", "18".to_string()),
                ("first_air_date_year", "1999".to_string()),
                ("sort_by", "first_air_date.desc".to_string()),
            ]
        );
        assert!(DiscoverFilters::default().to_params(MediaType::Movie).is_empty());
    }
}
