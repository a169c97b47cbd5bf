//! Tracker configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_RECENT_WINDOW_HOURS, DEFAULT_STORE_KEY};
use crate::error::{TrackerError, TrackerResult};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Directory the file backend writes to
    pub data_dir: PathBuf,
    /// Backend key the tracked leads are stored under
    pub store_key: String,
    /// Trailing window for the `recently_updated` statistic
    pub recent_window_hours: u32,
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            store_key: DEFAULT_STORE_KEY.to_string(),
            recent_window_hours: DEFAULT_RECENT_WINDOW_HOURS,
            log_level: "info".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> TrackerResult<()> {
        if self.recent_window_hours == 0 {
            return Err(TrackerError::config("recent_window_hours must be greater than zero"));
        }
        if self.store_key.trim().is_empty() {
            return Err(TrackerError::config("store_key must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(TrackerError::config(format!(
                "log_level '{}' is not one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
