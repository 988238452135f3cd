//! HTTP client for the job search and country-info APIs.
//!
//! Job searches go through a response cache first; only cache misses
//! spend the per-minute request budget.

use crate::api::adzuna::{process_job_data, RawCountry, RawSearchResponse};
use crate::api::cache::ResponseCache;
use crate::api::rate_limit::RateLimiter;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{CountryInfo, SearchParameters, SearchResult};
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rate-limiter endpoint name for job searches.
const JOBS_ENDPOINT: &str = "jobs";

/// Settings the client needs, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub app_id: String,
    pub app_key: String,
    pub jobs_base_url: String,
    pub countries_base_url: String,
    pub results_per_page: u32,
    pub timeout_seconds: u64,
    pub cache_ttl: Duration,
    pub requests_per_minute: u32,
    /// Fallback names used when the country API is unavailable.
    pub country_names: BTreeMap<String, String>,
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            app_id: config.api.app_id.clone(),
            app_key: config.api.app_key.clone(),
            jobs_base_url: config.api.jobs_base_url.trim_end_matches('/').to_string(),
            countries_base_url: config.api.countries_base_url.trim_end_matches('/').to_string(),
            results_per_page: config.settings.results_per_page,
            timeout_seconds: config.api.timeout_seconds,
            cache_ttl: Duration::from_millis(config.settings.cache_duration_ms),
            requests_per_minute: config.settings.rate_limit_per_minute,
            country_names: config.settings.supported_countries.clone(),
        }
    }
}

/// Client for job searches and country lookups.
pub struct JobMarketClient {
    config: ClientConfig,
    http_client: reqwest::Client,
    jobs_cache: ResponseCache<SearchResult>,
    country_cache: ResponseCache<CountryInfo>,
    rate_limiter: RateLimiter,
}

fn format_query_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

impl JobMarketClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        debug!(
            "Job API at {}, country API at {}, {} searches/minute",
            config.jobs_base_url, config.countries_base_url, config.requests_per_minute
        );

        Ok(Self {
            jobs_cache: ResponseCache::new(config.cache_ttl),
            country_cache: ResponseCache::new(config.cache_ttl),
            rate_limiter: RateLimiter::new(config.requests_per_minute),
            http_client,
            config,
        })
    }

    /// URL of the first results page for a country.
    pub fn search_url(&self, country: &str) -> String {
        format!("{}/{}/search/1", self.config.jobs_base_url, country)
    }

    /// Query parameters for a job search. Absent filters are omitted.
    pub fn search_query(&self, params: &SearchParameters) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("app_id", self.config.app_id.clone()),
            ("app_key", self.config.app_key.clone()),
            ("results_per_page", self.config.results_per_page.to_string()),
        ];

        if let Some(ref keywords) = params.keywords {
            query.push(("what", keywords.clone()));
        }
        if let Some(ref location) = params.location {
            query.push(("where", location.clone()));
        }
        if let Some(min) = params.salary_min {
            query.push(("salary_min", format_query_number(min)));
        }
        if let Some(max) = params.salary_max {
            query.push(("salary_max", format_query_number(max)));
        }

        query.push(("sort_by", "relevance".to_string()));
        query
    }

    /// Search for jobs and return the processed result.
    pub async fn search_jobs(&mut self, params: &SearchParameters) -> Result<SearchResult, ApiError> {
        let params = params.clone().normalized();

        if !params.has_search_terms() {
            return Err(ApiError::InvalidParameters(
                "Please enter either keywords or location to search for jobs.".to_string(),
            ));
        }
        if !params.has_valid_country() {
            return Err(ApiError::InvalidParameters(format!(
                "country must be a two-letter code, got '{}'",
                params.country
            )));
        }

        let cache_key = params.cache_key();
        if let Some(cached) = self.jobs_cache.get(&cache_key) {
            info!("Using cached job data");
            return Ok(cached);
        }

        if !self.rate_limiter.try_acquire(JOBS_ENDPOINT) {
            return Err(ApiError::RateLimited {
                endpoint: JOBS_ENDPOINT.to_string(),
            });
        }
        debug!(
            "{} job searches left this minute",
            self.rate_limiter.remaining_at(JOBS_ENDPOINT, Utc::now())
        );

        let url = self.search_url(&params.country);
        info!("Fetching jobs from: {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(&self.search_query(&params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let raw: RawSearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let result = process_job_data(raw);
        info!(
            "Received {} listings ({} total matches)",
            result.jobs.len(),
            result.total_jobs
        );

        let purged = self.jobs_cache.purge_expired_at(Utc::now());
        if purged > 0 {
            debug!("Dropped {} expired search results", purged);
        }
        self.jobs_cache.set(cache_key, result.clone());
        debug!("{} search results cached", self.jobs_cache.len());
        Ok(result)
    }

    /// Look up country metadata.
    ///
    /// Never fails: when the API cannot be reached a fallback built from the
    /// configured country names is returned (and not cached).
    pub async fn country_info(&mut self, country_code: &str) -> CountryInfo {
        let code = country_code.trim().to_lowercase();
        let cache_key = format!("country_{}", code);

        if let Some(cached) = self.country_cache.get(&cache_key) {
            debug!("Using cached country info for {}", code);
            return cached;
        }

        match self.fetch_country(&code).await {
            Ok(info) => {
                self.country_cache.set(cache_key, info.clone());
                info
            }
            Err(e) => {
                warn!("Country info error for '{}': {}", code, e);
                self.fallback_country(&code)
            }
        }
    }

    async fn fetch_country(&self, code: &str) -> Result<CountryInfo, ApiError> {
        let url = format!("{}/alpha/{}", self.config.countries_base_url, code);
        debug!("Fetching country info from: {}", url);

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let countries: Vec<RawCountry> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        countries
            .into_iter()
            .next()
            .map(RawCountry::into_info)
            .ok_or_else(|| ApiError::Parse("empty country response".to_string()))
    }

    fn fallback_country(&self, code: &str) -> CountryInfo {
        CountryInfo {
            name: self
                .config
                .country_names
                .get(code)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            currency: "USD".to_string(),
            region: "Unknown".to_string(),
            population: 0,
        }
    }
}
