//! Persistence of user preferences.
//!
//! Preferences live as one JSON blob under a single key of a small
//! key-value file. A missing or unreadable store never blocks a search:
//! errors are logged and defaults used.

use crate::models::SortBy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key under which the preference blob is stored.
pub const PREFERENCES_KEY: &str = "jobAnalyzer_preferences";

/// Remembered search settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

/// String key-value store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }

    /// Read a raw value.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Write a raw value, keeping other keys intact.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.read_all().unwrap_or_default();
        items.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&items)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }

    /// Load saved preferences, falling back to defaults on any error.
    pub fn load(&self) -> Preferences {
        let loaded = self.get_item(PREFERENCES_KEY).and_then(|blob| match blob {
            Some(blob) => serde_json::from_str(&blob).context("Invalid preference blob"),
            None => Ok(Preferences::default()),
        });

        match loaded {
            Ok(prefs) => {
                debug!("Loaded preferences: {:?}", prefs);
                prefs
            }
            Err(e) => {
                warn!("Could not load user preferences: {:#}", e);
                Preferences::default()
            }
        }
    }

    /// Save preferences. Failures are logged, not returned.
    pub fn save(&self, prefs: &Preferences) {
        let result = serde_json::to_string(prefs)
            .map_err(anyhow::Error::from)
            .and_then(|blob| self.set_item(PREFERENCES_KEY, &blob));

        match result {
            Ok(()) => debug!("Saved preferences to {}", self.path().display()),
            Err(e) => warn!("Could not save user preferences: {:#}", e),
        }
    }
}
