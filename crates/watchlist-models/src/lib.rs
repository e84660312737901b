pub mod media;
pub mod patch;
pub mod rating;
pub mod status;
pub mod watchlist;

pub use media::{CatalogItem, CatalogKey, Genre, MediaType};
pub use patch::{EntryPatch, FieldUpdate};
pub use rating::{InvalidRating, Rating};
pub use status::WatchStatus;
pub use watchlist::{EntryId, NewEntry, WatchlistEntry};
