use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override from `WATCHLIST_BASE_PATH`, if set
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("WATCHLIST_BASE_PATH").ok().map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("watchlist");

        Ok(Self::from_base(base_dir))
    }

    /// Lay everything out under one directory: config files at the top, data and logs in subdirs
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Durable mirror of the watchlist
    pub fn watchlist_file(&self) -> PathBuf {
        self.data_dir.join("watchlist-storage.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("watchlist.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths (e.g., ~/.config/watchlist on Linux), falling back to the cwd
        Self::new().unwrap_or_else(|_| Self::from_base(".watchlist"))
    }
}
