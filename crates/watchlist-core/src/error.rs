use std::path::PathBuf;

/// Failure of the durable mirror. Never fatal: the in-memory collection stays authoritative.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read watchlist storage {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write watchlist storage {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("watchlist storage is corrupt: {0}")]
    Corrupt(String),

    #[error("watchlist storage version {found} is newer than supported version {supported}")]
    IncompatibleVersion { found: u32, supported: u32 },

    #[error("failed to serialize watchlist: {0}")]
    Serialize(String),

    #[error("watchlist storage unavailable: {0}")]
    Unavailable(String),
}
