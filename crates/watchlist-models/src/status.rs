use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an entry sits in the user's viewing lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[default]
    WantToWatch,
    Watching,
    Watched,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 3] = [WatchStatus::WantToWatch, WatchStatus::Watching, WatchStatus::Watched];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::WantToWatch => "want_to_watch",
            WatchStatus::Watching => "watching",
            WatchStatus::Watched => "watched",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WatchStatus::WantToWatch => "Want to Watch",
            WatchStatus::Watching => "Watching",
            WatchStatus::Watched => "Watched",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "want_to_watch" | "want" | "planned" => Ok(WatchStatus::WantToWatch),
            "watching" => Ok(WatchStatus::Watching),
            "watched" | "completed" => Ok(WatchStatus::Watched),
            other => Err(format!(
                "Invalid status: {}. Use 'want_to_watch', 'watching', or 'watched'",
                other
            )),
        }
    }
}
