use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_data::HitType;

const APP_NAME: &str = "pullwatch";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to persist configuration")]
    Store(#[source] confy::ConfyError),
}

/// Application configuration, persisted as TOML in the platform config dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the client add-on writes its network logs into.
    pub log_directory: String,

    /// Manual hit-type corrections, keyed by uppercase hex ability id.
    /// Re-applied after every parse since the session model is rebuilt
    /// from scratch each time.
    pub hit_type_overrides: HashMap<String, HitType>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            hit_type_overrides: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load the config, falling back to defaults when missing or unreadable.
    pub fn load() -> Self {
        match confy::load(APP_NAME, None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to load configuration, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self).map_err(ConfigError::Store)
    }

    pub fn log_directory_path(&self) -> PathBuf {
        PathBuf::from(&self.log_directory)
    }
}

/// The add-on's default log location under the user's documents folder.
fn default_log_directory() -> String {
    dirs::document_dir()
        .map(|d| {
            d.join("Advanced Combat Tracker")
                .join("FFXIVLogs")
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_default()
}
