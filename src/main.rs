//! jobmarket - Job Market Analyzer
//!
//! A CLI tool that searches job listings, aggregates salary,
//! location, company and skill statistics, and writes Markdown,
//! JSON or CSV reports.
//!
//! Exit codes:
//!   0 - Success (including searches with no matching jobs)
//!   1 - Runtime error (configuration, rate limit, network, API error)

mod analysis;
mod api;
mod cli;
mod config;
mod error;
mod listing;
mod models;
mod preferences;
mod report;
mod suggest;

use anyhow::{Context, Result};
use api::{ClientConfig, JobMarketClient};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::{ReportMetadata, SearchResult, SortBy};
use preferences::{PreferenceStore, Preferences};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Handle --suggest early (no config or network needed)
    if let Some(ref query) = args.suggest {
        return handle_suggest(query);
    }

    // Initialize logging
    init_logging(&args);

    info!("jobmarket v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", redacted(&args));

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Search failed: {:#}", e);
            eprintln!("\n❌ Error: {}", e);
            if let Some(error::ApiError::RateLimited { endpoint }) = e.downcast_ref() {
                eprintln!(
                    "   The '{}' budget resets next minute; cached searches still work.",
                    endpoint
                );
            }
            std::process::exit(1);
        }
    }
}

/// Copy of the arguments safe to log.
fn redacted(args: &Args) -> Args {
    let mut args = args.clone();
    if args.app_key.is_some() {
        args.app_key = Some("***".to_string());
    }
    args
}

/// Handle --init-config: generate a default .jobmarket.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Add your Adzuna app_id and app_key under [api].");
    Ok(())
}

/// Handle --suggest: print matching job titles.
fn handle_suggest(query: &str) -> Result<()> {
    let found = suggest::suggestions(query);

    if found.is_empty() {
        println!("No suggestions for '{}'.", query);
    } else {
        for keyword in found {
            println!("  {}", keyword);
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run a search and write the report. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    if args.list_countries {
        return handle_list_countries(&config);
    }

    config.validate_credentials()?;

    // Resolve country and ordering: CLI, then saved preferences, then config
    let store = PreferenceStore::new(&config.preferences.path);
    let saved = store.load();

    let country = args
        .country
        .clone()
        .or(saved.country)
        .unwrap_or_else(|| config.settings.default_country.clone())
        .trim()
        .to_lowercase();
    if config.country_name(&country).is_none() {
        warn!("Country '{}' is not in the supported list", country);
    }

    let sort_by = args
        .sort_by
        .or(saved.sort_by)
        .unwrap_or(config.display.sort_by);

    let params = args.search_parameters(&country);

    let mut client = JobMarketClient::new(ClientConfig::from(&config))?;

    // Step 1: Search
    println!("🔍 Searching jobs in {}...", country.to_uppercase());
    let spinner = start_spinner(!args.quiet, "Fetching job listings...");
    let search = client.search_jobs(&params).await;
    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }
    let mut result = search?;

    if result.jobs.is_empty() {
        println!("\nNo jobs found matching your criteria. Try different search parameters.");
        return Ok(0);
    }

    if config.preferences.remember {
        store.save(&Preferences {
            country: Some(country.clone()),
            sort_by: Some(sort_by),
        });
    }

    // Step 2: Country details
    let country_info = if args.no_country_info {
        None
    } else {
        Some(client.country_info(&country).await)
    };

    // Step 3: Order the listing
    listing::sort_jobs(&mut result.jobs, sort_by, args.reverse);

    print_summary(&result, sort_by);

    // Step 4: Write the output
    let metadata = ReportMetadata {
        parameters: params,
        generated_at: Utc::now(),
        country: country_info,
        sort_by,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let (output_path, content) = render_output(&args, &config, &metadata, &result)?;

    report::write_export(&output_path, &content)?;

    println!("\n✅ Done! Output saved to: {}", output_path.display());
    Ok(0)
}

/// Render the requested output format and pick its file path.
fn render_output(
    args: &Args,
    config: &Config,
    metadata: &ReportMetadata,
    result: &SearchResult,
) -> Result<(PathBuf, String)> {
    let default_path = || match args.format {
        OutputFormat::Markdown => PathBuf::from("job-market-report.md"),
        other => report::default_export_name(metadata.generated_at.date_naive(), other.extension()),
    };
    let path = args.output.clone().unwrap_or_else(default_path);

    let content = match args.format {
        OutputFormat::Markdown => {
            let page = listing::paginate(&result.jobs, args.page, config.display.items_per_page);
            if page.number != args.page {
                warn!(
                    "Page {} is out of range, showing page {} of {}",
                    args.page, page.number, page.total_pages
                );
            }
            report::generate_markdown_report(metadata, result, &page)
        }
        OutputFormat::Json => report::export_json(result)?,
        OutputFormat::Csv => report::export_csv(&result.jobs)?,
    };

    Ok((path, content))
}

/// Print the headline figures to stdout.
fn print_summary(result: &SearchResult, sort_by: SortBy) {
    println!("\n📊 Market Summary:");
    println!("   Total jobs: {}", report::format_count(result.total_jobs));
    println!("   Listings received: {}", result.jobs.len());
    println!(
        "   Average salary: {}",
        report::average_salary_label(result.salary_stats.as_ref())
    );
    println!(
        "   Top company: {}",
        result.company_stats.leader().unwrap_or("Various")
    );
    println!(
        "   Top location: {}",
        result.location_stats.leader().unwrap_or("Various")
    );
    if let Some(skill) = result.skill_stats.first() {
        println!("   Most requested skill: {} ({} listings)", skill.name, skill.demand);
    }
    println!("   Sorted by: {}", sort_by);
}

/// Handle --list-countries: print the supported country codes.
fn handle_list_countries(config: &Config) -> Result<i32> {
    println!("Supported countries:\n");
    for (code, name) in &config.settings.supported_countries {
        let marker = if *code == config.settings.default_country {
            " (default)"
        } else {
            ""
        };
        println!("   {}  {}{}", code, name, marker);
    }
    Ok(0)
}

/// Spinner shown while waiting on the network.
fn start_spinner(show: bool, message: &str) -> Option<ProgressBar> {
    if !show {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
