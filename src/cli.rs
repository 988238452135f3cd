//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{SearchParameters, SortBy};
use clap::Parser;
use std::path::PathBuf;

/// jobmarket - job market analyzer
///
/// Search job listings, summarize salaries, locations, companies and
/// in-demand skills, and export the results.
///
/// Examples:
///   jobmarket --keywords "rust developer" --country gb
///   jobmarket --location Berlin --country de --sort-by salary
///   jobmarket -k "data analyst" --format csv --output jobs.csv
///   jobmarket --suggest dev
///   jobmarket --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Keywords to search for (job title, skills, ...)
    #[arg(short, long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Location to search in (city, region)
    #[arg(short, long, value_name = "TEXT")]
    pub location: Option<String>,

    /// Two-letter country code
    ///
    /// Defaults to the saved preference, then to the config file.
    #[arg(short, long, value_name = "CODE")]
    pub country: Option<String>,

    /// Minimum salary filter
    #[arg(long, value_name = "AMOUNT")]
    pub salary_min: Option<f64>,

    /// Maximum salary filter
    #[arg(long, value_name = "AMOUNT")]
    pub salary_max: Option<f64>,

    /// Listing order
    ///
    /// Defaults to the saved preference, then to the config file.
    #[arg(short, long, value_name = "ORDER")]
    pub sort_by: Option<SortBy>,

    /// Reverse the listing order
    #[arg(long)]
    pub reverse: bool,

    /// Page of the listing to show (1-based)
    #[arg(short, long, default_value = "1", value_name = "N")]
    pub page: usize,

    /// Listings per page
    #[arg(long, value_name = "N")]
    pub per_page: Option<usize>,

    /// Listings to request from the API
    #[arg(long, value_name = "N")]
    pub results: Option<u32>,

    /// Output format (markdown, json, csv)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path
    ///
    /// Defaults to job-market-report.md for markdown and
    /// job-market-data-<date>.<ext> for exports.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the country-info lookup
    #[arg(long)]
    pub no_country_info: bool,

    /// Adzuna application id
    #[arg(long, env = "ADZUNA_APP_ID", hide_env_values = true)]
    pub app_id: Option<String>,

    /// Adzuna application key
    #[arg(long, env = "ADZUNA_APP_KEY", hide_env_values = true)]
    pub app_key: Option<String>,

    /// Job search API base URL
    #[arg(long, env = "JOBMARKET_JOBS_URL", value_name = "URL")]
    pub jobs_url: Option<String>,

    /// Country-info API base URL
    #[arg(long, env = "JOBMARKET_COUNTRIES_URL", value_name = "URL")]
    pub countries_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .jobmarket.toml in the current directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print job title suggestions matching a query and exit
    #[arg(long, value_name = "QUERY")]
    pub suggest: Option<String>,

    /// List supported country codes and exit
    #[arg(long)]
    pub list_countries: bool,

    /// Generate a default .jobmarket.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown summary report (default)
    #[default]
    Markdown,
    /// Full result set as pretty-printed JSON
    Json,
    /// Job listings as CSV
    Csv,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// True when the invocation runs a search (not a utility flag).
    pub fn is_search(&self) -> bool {
        !(self.init_config || self.list_countries || self.suggest.is_some())
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if !self.is_search() {
            return Ok(());
        }

        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.keywords) && blank(&self.location) {
            return Err(
                "Please enter either keywords or location to search for jobs.".to_string(),
            );
        }

        if let Some(ref country) = self.country {
            let country = country.trim();
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(format!(
                    "Country must be a two-letter code (got '{}')",
                    country
                ));
            }
        }

        for (name, value) in [("--salary-min", self.salary_min), ("--salary-max", self.salary_max)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("{} must be a non-negative number", name));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > 0.0 && max > 0.0 && min > max {
                return Err("--salary-min cannot exceed --salary-max".to_string());
            }
        }

        if self.page == 0 {
            return Err("Page must be at least 1".to_string());
        }

        if self.per_page == Some(0) {
            return Err("Per-page must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        for url in [&self.jobs_url, &self.countries_url].into_iter().flatten() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("URL must start with 'http://' or 'https://': {}", url));
            }
        }

        Ok(())
    }

    /// Build search parameters for the resolved country.
    pub fn search_parameters(&self, country: &str) -> SearchParameters {
        SearchParameters {
            keywords: self.keywords.clone(),
            location: self.location.clone(),
            country: country.to_string(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        }
        .normalized()
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
