use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the stored catalog API key
pub const API_KEY_ENV_VAR: &str = "WATCHLIST_TMDB_API_KEY";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub browse: BrowseOptions,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote catalog connection settings. The API key is a credential and lives in `credentials.toml`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// How many remote results the views keep
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BrowseOptions {
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Overrides the default watchlist file in the data directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_trending_limit() -> usize {
    8
}

fn default_search_limit() -> usize {
    20
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            trending_limit: default_trending_limit(),
            search_limit: default_search_limit(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or the defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        if self.tmdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("tmdb.timeout_seconds must be greater than zero"));
        }

        if self.browse.trending_limit == 0 || self.browse.search_limit == 0 {
            return Err(anyhow::anyhow!("browse limits must be greater than zero"));
        }

        Ok(())
    }

    /// Watchlist file, honouring the `[storage] file` override
    pub fn watchlist_file(&self, paths: &crate::PathManager) -> PathBuf {
        self.storage
            .file
            .clone()
            .unwrap_or_else(|| paths.watchlist_file())
    }
}
