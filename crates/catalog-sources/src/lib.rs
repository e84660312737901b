pub mod error;
pub mod image;
pub mod query;
pub mod tmdb;
pub mod traits;

pub use error::RemoteError;
pub use image::{ImageKind, ImageResolver};
pub use query::{CatalogCategory, DiscoverFilters, SortBy};
pub use tmdb::TmdbClient;
pub use traits::CatalogSource;
