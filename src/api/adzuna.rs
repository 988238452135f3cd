//! Wire formats of the job-search and country-info APIs, and their
//! normalization into domain types.

use crate::analysis::{build_search_result, process_salary};
use crate::models::{CountryInfo, JobListing, SearchResult, UNKNOWN_COMPANY, UNKNOWN_LOCATION};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Maximum description length kept, in characters.
pub const DESCRIPTION_LIMIT: usize = 300;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern is valid"));

/// Top-level job search response.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Option<Vec<RawJob>>,
}

/// A field the API sends either as a JSON number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Number(f64),
    Text(String),
}

impl Loose {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => Some(*n),
            Loose::Text(s) => s.trim().parse().ok(),
        }
    }

    fn into_string(self) -> String {
        match self {
            Loose::Number(n) if n.fract() == 0.0 => format!("{:.0}", n),
            Loose::Number(n) => n.to_string(),
            Loose::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDisplayName {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCategory {
    #[serde(default)]
    pub label: Option<String>,
}

/// One posting as returned by the job search API.
#[derive(Debug, Default, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<RawDisplayName>,
    #[serde(default)]
    pub location: Option<RawDisplayName>,
    #[serde(default)]
    pub salary_min: Option<Loose>,
    #[serde(default)]
    pub salary_max: Option<Loose>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub category: Option<RawCategory>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawJob {
    /// Normalize into a [`JobListing`], filling placeholders for missing fields.
    pub fn into_listing(self) -> JobListing {
        let salary = process_salary(
            self.salary_min.as_ref().and_then(Loose::as_f64),
            self.salary_max.as_ref().and_then(Loose::as_f64),
        );

        JobListing {
            id: self.id.map(Loose::into_string).unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            company: non_empty(self.company.and_then(|c| c.display_name))
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            location: non_empty(self.location.and_then(|l| l.display_name))
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            salary,
            description: clean_description(self.description.as_deref()),
            url: self.redirect_url.unwrap_or_default(),
            created: self.created.as_deref().and_then(parse_timestamp),
            contract_type: non_empty(self.contract_type)
                .unwrap_or_else(|| "Not specified".to_string()),
            category: non_empty(self.category.and_then(|c| c.label))
                .unwrap_or_else(|| "General".to_string()),
        }
    }
}

/// Normalize a raw search response and compute all statistics.
pub fn process_job_data(raw: RawSearchResponse) -> SearchResult {
    let jobs: Vec<JobListing> = raw
        .results
        .unwrap_or_default()
        .into_iter()
        .map(RawJob::into_listing)
        .collect();

    build_search_result(raw.count, jobs)
}

/// Strip HTML tags and truncate to [`DESCRIPTION_LIMIT`] characters.
pub fn clean_description(description: Option<&str>) -> String {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return "No description available".to_string();
    };

    let text = HTML_TAG.replace_all(description, "");

    if text.chars().count() > DESCRIPTION_LIMIT {
        let truncated: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{}...", truncated)
    } else {
        text.into_owned()
    }
}

/// Parse an API timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCountryName {
    #[serde(default)]
    pub common: Option<String>,
}

/// One entry of the country-info response array.
#[derive(Debug, Default, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: Option<RawCountryName>,
    #[serde(default)]
    pub currencies: Option<Map<String, Value>>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
}

impl RawCountry {
    /// Convert into [`CountryInfo`], defaulting the currency to USD.
    pub fn into_info(self) -> CountryInfo {
        CountryInfo {
            name: self
                .name
                .and_then(|n| n.common)
                .unwrap_or_else(|| "Unknown".to_string()),
            currency: self
                .currencies
                .and_then(|c| c.keys().next().cloned())
                .unwrap_or_else(|| "USD".to_string()),
            region: self.region.unwrap_or_else(|| "Unknown".to_string()),
            population: self.population.unwrap_or(0),
        }
    }
}
