//! Store configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::db::error::StoreError;
use crate::db::migrations::UpgradePolicy;
use crate::db::schema::DATABASE_NAME;

/// Directory created under the platform data dir for the database file.
const APP_DIR: &str = "flashcards";

/// Settings for opening a [`crate::FlashcardStore`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    /// Reject decks and flashcards whose parent id does not exist.
    pub enforce_foreign_keys: bool,
    pub upgrade_policy: UpgradePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            enforce_foreign_keys: true,
            upgrade_policy: UpgradePolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Default settings targeting a specific database file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    pub fn with_upgrade_policy(mut self, policy: UpgradePolicy) -> Self {
        self.upgrade_policy = policy;
        self
    }

    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(|e| StoreError::Config(e.to_string()))
    }
}

fn default_database_path() -> PathBuf {
    // Use the platform data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(DATABASE_NAME)
}
