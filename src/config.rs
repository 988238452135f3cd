//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.jobmarket.toml` files.

use crate::models::SortBy;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".jobmarket.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API endpoints and credentials.
    #[serde(default)]
    pub api: ApiConfig,

    /// Search, cache and rate-limit settings.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Listing display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Preference storage settings.
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Job-search and country-info API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Adzuna application id.
    #[serde(default)]
    pub app_id: String,

    /// Adzuna application key.
    #[serde(default)]
    pub app_key: String,

    /// Base URL of the job search API.
    #[serde(default = "default_jobs_base_url")]
    pub jobs_base_url: String,

    /// Base URL of the country-info API.
    #[serde(default = "default_countries_base_url")]
    pub countries_base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_key: String::new(),
            jobs_base_url: default_jobs_base_url(),
            countries_base_url: default_countries_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_jobs_base_url() -> String {
    "https://api.adzuna.com/v1/api/jobs".to_string()
}

fn default_countries_base_url() -> String {
    "https://restcountries.com/v3.1".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Search behaviour, cache lifetime and request budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Listings requested per search.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: u32,

    /// Upper bound accepted for `results_per_page`.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Cache validity window in milliseconds.
    #[serde(default = "default_cache_duration_ms")]
    pub cache_duration_ms: u64,

    /// Job searches allowed per minute.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Country used when neither the CLI nor saved preferences name one.
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Country codes the job API serves, with display names.
    #[serde(default = "default_supported_countries")]
    pub supported_countries: BTreeMap<String, String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            results_per_page: default_results_per_page(),
            max_results: default_max_results(),
            cache_duration_ms: default_cache_duration_ms(),
            rate_limit_per_minute: default_rate_limit(),
            default_country: default_country(),
            supported_countries: default_supported_countries(),
        }
    }
}

fn default_results_per_page() -> u32 {
    20
}

fn default_max_results() -> u32 {
    100
}

fn default_cache_duration_ms() -> u64 {
    300_000 // 5 minutes
}

fn default_rate_limit() -> u32 {
    10
}

fn default_country() -> String {
    "us".to_string()
}

fn default_supported_countries() -> BTreeMap<String, String> {
    [
        ("us", "United States"),
        ("gb", "United Kingdom"),
        ("ca", "Canada"),
        ("au", "Australia"),
        ("de", "Germany"),
        ("fr", "France"),
        ("nl", "Netherlands"),
        ("nz", "New Zealand"),
        ("za", "South Africa"),
        ("in", "India"),
    ]
    .into_iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

/// Listing display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Listings shown per page.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Default listing order.
    #[serde(default)]
    pub sort_by: SortBy,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            sort_by: SortBy::default(),
        }
    }
}

fn default_items_per_page() -> usize {
    10
}

/// Where user preferences are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Path of the preferences store.
    #[serde(default = "default_preferences_path")]
    pub path: String,

    /// Save country and sort order after each successful search.
    #[serde(default = "default_true")]
    pub remember: bool,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
            remember: true,
        }
    }
}

fn default_preferences_path() -> String {
    ".jobmarket_prefs.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref app_id) = args.app_id {
            self.api.app_id = app_id.clone();
        }
        if let Some(ref app_key) = args.app_key {
            self.api.app_key = app_key.clone();
        }
        if let Some(ref url) = args.jobs_url {
            self.api.jobs_base_url = url.clone();
        }
        if let Some(ref url) = args.countries_url {
            self.api.countries_base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(results) = args.results {
            self.settings.results_per_page = results;
        }
        if let Some(per_page) = args.per_page {
            self.display.items_per_page = per_page;
        }
    }

    /// Check that API credentials are configured.
    pub fn validate_credentials(&self) -> Result<()> {
        if self.api.app_id.trim().is_empty() && self.api.app_key.trim().is_empty() {
            bail!(
                "API keys not configured. Set ADZUNA_APP_ID and ADZUNA_APP_KEY, pass \
                 --app-id/--app-key, or add them to {} (free keys: https://developer.adzuna.com/)",
                CONFIG_FILE
            );
        }
        Ok(())
    }

    /// Check numeric settings for sane values.
    pub fn validate(&self) -> Result<()> {
        let s = &self.settings;
        if s.results_per_page == 0 || s.results_per_page > s.max_results {
            bail!(
                "results_per_page must be between 1 and {} (got {})",
                s.max_results,
                s.results_per_page
            );
        }
        if self.display.items_per_page == 0 {
            bail!("items_per_page must be at least 1");
        }
        if self.api.timeout_seconds == 0 {
            bail!("timeout_seconds must be at least 1");
        }
        Ok(())
    }

    /// Display name of a supported country code.
    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.settings
            .supported_countries
            .get(&code.to_lowercase())
            .map(String::as_str)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
