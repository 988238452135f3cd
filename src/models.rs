//! Data models for the job market analyzer.
//!
//! This module contains the core data structures shared by the API client,
//! the aggregation pipeline, and the report writers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a posting has no company name.
pub const UNKNOWN_COMPANY: &str = "Company not specified";

/// Placeholder used when a posting has no location.
pub const UNKNOWN_LOCATION: &str = "Location not specified";

/// Parameters for a single job search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    /// Free-text keywords ("what").
    pub keywords: Option<String>,
    /// Free-text location ("where").
    pub location: Option<String>,
    /// Two-letter country code, lowercase.
    pub country: String,
    /// Minimum annual salary filter.
    pub salary_min: Option<f64>,
    /// Maximum annual salary filter.
    pub salary_max: Option<f64>,
}

impl SearchParameters {
    /// Trim text fields, drop empty ones, and lowercase the country code.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            keywords: clean(self.keywords),
            location: clean(self.location),
            country: self.country.trim().to_lowercase(),
            salary_min: self.salary_min.filter(|v| *v > 0.0),
            salary_max: self.salary_max.filter(|v| *v > 0.0),
        }
    }

    /// A search needs at least one of keywords or location.
    pub fn has_search_terms(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.keywords) || present(&self.location)
    }

    /// Returns true if the country is a two-letter ASCII code.
    pub fn has_valid_country(&self) -> bool {
        self.country.len() == 2 && self.country.chars().all(|c| c.is_ascii_alphabetic())
    }

    /// Cache key for this parameter set.
    pub fn cache_key(&self) -> String {
        let serialized = serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        format!("jobs_{}", serialized)
    }
}

/// Normalized salary information for one posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// Display form, e.g. `$80K - $95K`.
    pub formatted: String,
}

/// A single job posting after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<Salary>,
    /// HTML-stripped and truncated description.
    pub description: String,
    pub url: String,
    pub created: Option<DateTime<Utc>>,
    pub contract_type: String,
    pub category: String,
}

/// One histogram bucket of the salary distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBucket {
    /// Human-readable range label.
    pub range: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

/// Summary statistics over per-job average salaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub median: f64,
    pub distribution: Vec<SalaryBucket>,
}

/// A single row of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub name: String,
    pub count: usize,
    /// Share of all jobs in the result set, 0-100.
    pub percentage: f64,
}

/// Top-N frequency table for a job attribute (location, company).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStats {
    /// Most frequent values, highest count first.
    pub top: Vec<FrequencyEntry>,
    /// Number of distinct values seen.
    pub total: usize,
}

impl FrequencyStats {
    /// Name of the most frequent value, if any.
    pub fn leader(&self) -> Option<&str> {
        self.top.first().map(|e| e.name.as_str())
    }
}

/// Number of postings mentioning a skill keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub name: String,
    pub demand: usize,
}

/// Processed result of a job search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Total matches reported by the API (may exceed `jobs.len()`).
    pub total_jobs: u64,
    pub jobs: Vec<JobListing>,
    pub salary_stats: Option<SalaryStats>,
    pub location_stats: FrequencyStats,
    pub company_stats: FrequencyStats,
    pub skill_stats: Vec<SkillDemand>,
}

/// Country metadata from the country-info API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub name: String,
    pub currency: String,
    pub region: String,
    pub population: u64,
}

/// Context printed at the top of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Parameters the search ran with.
    pub parameters: SearchParameters,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Country details, when looked up.
    pub country: Option<CountryInfo>,
    /// Listing order used.
    pub sort_by: SortBy,
    /// Wall-clock time of the search in seconds.
    pub duration_seconds: f64,
}

/// Ordering for the job listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Most recent first
    #[default]
    Date,
    /// Highest salary first
    Salary,
    /// Company name A-Z
    Company,
    /// Location A-Z
    Location,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Date => write!(f, "date"),
            SortBy::Salary => write!(f, "salary"),
            SortBy::Company => write!(f, "company"),
            SortBy::Location => write!(f, "location"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParameters {
        SearchParameters {
            keywords: Some("  rust developer ".to_string()),
            location: Some("   ".to_string()),
            country: " GB ".to_string(),
            salary_min: Some(0.0),
            salary_max: Some(90000.0),
        }
    }

    #[test]
    fn test_normalized_trims_and_drops_empty() {
        let p = params().normalized();
        assert_eq!(p.keywords.as_deref(), Some("rust developer"));
        assert_eq!(p.location, None);
        assert_eq!(p.country, "gb");
        assert_eq!(p.salary_min, None);
        assert_eq!(p.salary_max, Some(90000.0));
    }

    #[test]
    fn test_has_search_terms() {
        assert!(params().has_search_terms());

        let empty = SearchParameters {
            keywords: Some(" ".to_string()),
            location: None,
            country: "us".to_string(),
            ..Default::default()
        };
        assert!(!empty.has_search_terms());

        let location_only = SearchParameters {
            location: Some("London".to_string()),
            ..empty
        };
        assert!(location_only.has_search_terms());
    }

    #[test]
    fn test_country_validation() {
        let mut p = params().normalized();
        assert!(p.has_valid_country());
        p.country = "usa".to_string();
        assert!(!p.has_valid_country());
        p.country = "u1".to_string();
        assert!(!p.has_valid_country());
    }

    #[test]
    fn test_cache_key_distinguishes_parameters() {
        let a = params().normalized();
        let mut b = a.clone();
        b.salary_max = Some(100000.0);

        assert!(a.cache_key().starts_with("jobs_"));
        assert_eq!(a.cache_key(), a.clone().cache_key());
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_frequency_leader() {
        let stats = FrequencyStats {
            top: vec![FrequencyEntry {
                name: "London".to_string(),
                count: 3,
                percentage: 60.0,
            }],
            total: 2,
        };
        assert_eq!(stats.leader(), Some("London"));
        assert_eq!(FrequencyStats::default().leader(), None);
    }

    #[test]
    fn test_sort_by_serde_roundtrip_names() {
        assert_eq!(serde_json::to_string(&SortBy::Salary).unwrap(), "\"salary\"");
        let parsed: SortBy = serde_json::from_str("\"company\"").unwrap();
        assert_eq!(parsed, SortBy::Company);
        assert_eq!(SortBy::default().to_string(), "date");
    }
}
