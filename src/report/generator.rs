//! Markdown report generation.
//!
//! This module renders a search result as a Markdown market summary:
//! headline figures, salary histogram, frequency tables and one page of
//! listings.

use crate::listing::{time_ago, Page};
use crate::models::{
    CountryInfo, FrequencyStats, JobListing, ReportMetadata, SalaryStats, SearchResult,
    SkillDemand,
};
use chrono::{DateTime, Utc};

/// Width of the longest histogram bar, in characters.
const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    metadata: &ReportMetadata,
    result: &SearchResult,
    page: &Page<'_>,
) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Job Market Report\n\n");

    output.push_str(&generate_metadata_section(metadata));

    if let Some(ref country) = metadata.country {
        output.push_str(&generate_country_section(country));
    }

    output.push_str(&generate_summary_section(result));

    output.push_str(&generate_salary_section(result.salary_stats.as_ref()));

    output.push_str(&generate_frequency_section(
        "Top Locations",
        "Location",
        &result.location_stats,
    ));
    output.push_str(&generate_frequency_section(
        "Top Companies",
        "Company",
        &result.company_stats,
    ));

    output.push_str(&generate_skills_section(&result.skill_stats));

    output.push_str(&generate_listing_section(page, metadata.generated_at));

    output.push_str(&generate_footer());

    output
}

/// Format an integer with thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Headline average salary, rounded, or `N/A`.
pub fn average_salary_label(stats: Option<&SalaryStats>) -> String {
    match stats {
        Some(s) if s.average > 0.0 => format_count(s.average.round() as u64),
        _ => "N/A".to_string(),
    }
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();
    let params = &metadata.parameters;

    section.push_str("## Search\n\n");
    if let Some(ref keywords) = params.keywords {
        section.push_str(&format!("- **Keywords:** {}\n", keywords));
    }
    if let Some(ref location) = params.location {
        section.push_str(&format!("- **Location:** {}\n", location));
    }
    section.push_str(&format!("- **Country:** `{}`\n", params.country));
    if let Some(min) = params.salary_min {
        section.push_str(&format!("- **Minimum Salary:** {}\n", format_count(min as u64)));
    }
    if let Some(max) = params.salary_max {
        section.push_str(&format!("- **Maximum Salary:** {}\n", format_count(max as u64)));
    }
    section.push_str(&format!("- **Sorted By:** {}\n", metadata.sort_by));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Search Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_country_section(country: &CountryInfo) -> String {
    let mut section = String::new();

    section.push_str("## Country\n\n");
    section.push_str("| Name | Region | Currency | Population |\n");
    section.push_str("|:---|:---|:---:|---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        country.name,
        country.region,
        country.currency,
        format_count(country.population)
    ));

    section
}

fn generate_summary_section(result: &SearchResult) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Jobs | Average Salary | Top Company | Top Location |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_count(result.total_jobs),
        average_salary_label(result.salary_stats.as_ref()),
        result.company_stats.leader().unwrap_or("Various"),
        result.location_stats.leader().unwrap_or("Various"),
    ));

    section
}

fn bar(count: usize, max_count: usize) -> String {
    if max_count == 0 || count == 0 {
        return String::new();
    }
    let width = ((count * BAR_WIDTH) as f64 / max_count as f64).ceil() as usize;
    "█".repeat(width.max(1))
}

fn generate_salary_section(stats: Option<&SalaryStats>) -> String {
    let mut section = String::new();

    section.push_str("## Salary Distribution\n\n");

    let Some(stats) = stats else {
        section.push_str("No salary information available for these listings.\n\n");
        return section;
    };

    section.push_str(&format!(
        "*{} listings with salary | Min: {} | Median: {} | Max: {}*\n\n",
        stats.count,
        format_count(stats.min.round() as u64),
        format_count(stats.median.round() as u64),
        format_count(stats.max.round() as u64),
    ));

    let max_count = stats.distribution.iter().map(|b| b.count).max().unwrap_or(0);

    section.push_str("| Range | Jobs | |\n");
    section.push_str("|:---|:---:|:---|\n");
    for bucket in &stats.distribution {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            bucket.range,
            bucket.count,
            bar(bucket.count, max_count)
        ));
    }
    section.push('\n');

    section
}

fn generate_frequency_section(title: &str, column: &str, stats: &FrequencyStats) -> String {
    if stats.top.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));
    section.push_str(&format!("*{} distinct*\n\n", stats.total));
    section.push_str(&format!("| {} | Jobs | Share |\n", column));
    section.push_str("|:---|:---:|---:|\n");

    for entry in &stats.top {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            entry.name, entry.count, entry.percentage
        ));
    }
    section.push('\n');

    section
}

fn generate_skills_section(skills: &[SkillDemand]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    let max_demand = skills.iter().map(|s| s.demand).max().unwrap_or(0);

    section.push_str("## Top Skills in Demand\n\n");
    section.push_str("| Skill | Mentions | |\n");
    section.push_str("|:---|:---:|:---|\n");

    for skill in skills {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            skill.name,
            skill.demand,
            bar(skill.demand, max_demand)
        ));
    }
    section.push('\n');

    section
}

fn generate_listing_section(page: &Page<'_>, now: DateTime<Utc>) -> String {
    let mut section = String::new();

    section.push_str("## Job Listings\n\n");

    if page.items.is_empty() {
        section.push_str("No listings to show.\n\n");
        return section;
    }

    section.push_str(&format!(
        "*Page {} of {} ({} listings)*\n\n",
        page.number, page.total_pages, page.total_items
    ));

    for job in page.items {
        section.push_str(&generate_job_block(job, now));
    }

    let mut nav = Vec::new();
    if page.has_prev() {
        nav.push(format!("previous: `--page {}`", page.number - 1));
    }
    if page.has_next() {
        nav.push(format!("next: `--page {}`", page.number + 1));
    }
    if !nav.is_empty() {
        section.push_str(&format!("*More listings ({})*\n\n", nav.join(", ")));
    }

    section
}

fn generate_job_block(job: &JobListing, now: DateTime<Utc>) -> String {
    let mut block = String::new();

    let salary = job
        .salary
        .as_ref()
        .map(|s| s.formatted.as_str())
        .unwrap_or("Salary not specified");

    block.push_str(&format!("### {}\n\n", job.title));
    block.push_str(&format!("**{}** | {}\n\n", job.company, salary));
    block.push_str(&format!(
        "📍 {} | 📋 {} | 🕒 {}\n\n",
        job.location,
        job.contract_type,
        time_ago(job.created, now)
    ));

    if !job.description.is_empty() {
        block.push_str(&format!("{}\n\n", job.description));
    }

    if !job.url.is_empty() {
        block.push_str(&format!("[View Job →]({})\n\n", job.url));
    }

    block.push_str("---\n\n");

    block
}

fn generate_footer() -> String {
    "*Report generated by jobmarket*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_search_result, process_salary};
    use crate::listing::paginate;
    use crate::models::{SearchParameters, SortBy};
    use chrono::TimeZone;

    fn create_test_job(id: &str, company: &str, salary: Option<f64>) -> JobListing {
        JobListing {
            id: id.to_string(),
            title: format!("Rust Engineer {}", id),
            company: company.to_string(),
            location: "London".to_string(),
            salary: salary.and_then(|s| process_salary(Some(s), None)),
            description: "Write Rust and SQL".to_string(),
            url: format!("https://example.com/{}", id),
            created: Some(Utc.with_ymd_and_hms(2024, 5, 30, 8, 0, 0).unwrap()),
            contract_type: "permanent".to_string(),
            category: "IT Jobs".to_string(),
        }
    }

    fn create_test_metadata(country: Option<CountryInfo>) -> ReportMetadata {
        ReportMetadata {
            parameters: SearchParameters {
                keywords: Some("rust".to_string()),
                location: None,
                country: "gb".to_string(),
                salary_min: Some(40000.0),
                salary_max: None,
            },
            generated_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            country,
            sort_by: SortBy::Date,
            duration_seconds: 1.25,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(67215293), "67,215,293");
    }

    #[test]
    fn test_generate_markdown_report() {
        let jobs = vec![
            create_test_job("1", "Ferrous Ltd", Some(70000.0)),
            create_test_job("2", "Ferrous Ltd", Some(90000.0)),
            create_test_job("3", "Oxide Co", None),
        ];
        let result = build_search_result(Some(1520), jobs);
        let page = paginate(&result.jobs, 1, 10);
        let country = CountryInfo {
            name: "United Kingdom".to_string(),
            currency: "GBP".to_string(),
            region: "Europe".to_string(),
            population: 67215293,
        };

        let markdown = generate_markdown_report(&create_test_metadata(Some(country)), &result, &page);

        assert!(markdown.contains("# Job Market Report"));
        assert!(markdown.contains("- **Keywords:** rust"));
        assert!(markdown.contains("- **Minimum Salary:** 40,000"));
        assert!(markdown.contains("| United Kingdom | Europe | GBP | 67,215,293 |"));
        assert!(markdown.contains("| 1,520 | 80,000 | Ferrous Ltd | London |"));
        assert!(markdown.contains("## Salary Distribution"));
        assert!(markdown.contains("| Ferrous Ltd | 2 | 66.7% |"));
        assert!(markdown.contains("## Top Skills in Demand"));
        assert!(markdown.contains("*Page 1 of 1 (3 listings)*"));
        assert!(markdown.contains("Salary not specified"));
        assert!(markdown.contains("🕒 2 days ago"));
        assert!(markdown.contains("[View Job →](https://example.com/1)"));
    }

    #[test]
    fn test_report_without_salaries_or_country() {
        let result = build_search_result(None, vec![create_test_job("1", "Acme", None)]);
        let page = paginate(&result.jobs, 1, 10);
        let markdown = generate_markdown_report(&create_test_metadata(None), &result, &page);

        assert!(!markdown.contains("## Country"));
        assert!(markdown.contains("No salary information available"));
        assert!(markdown.contains("| 1 | N/A | Acme | London |"));
    }

    #[test]
    fn test_listing_page_navigation() {
        let jobs: Vec<JobListing> = (1..=3)
            .map(|i| create_test_job(&i.to_string(), "Acme", None))
            .collect();
        let result = build_search_result(None, jobs);

        let middle = paginate(&result.jobs, 2, 1);
        let markdown = generate_markdown_report(&create_test_metadata(None), &result, &middle);
        assert!(markdown.contains("### Rust Engineer 2"));
        assert!(!markdown.contains("### Rust Engineer 1"));
        assert!(markdown.contains("*More listings (previous: `--page 1`, next: `--page 3`)*"));

        let single = paginate(&result.jobs, 1, 10);
        let markdown = generate_markdown_report(&create_test_metadata(None), &result, &single);
        assert!(!markdown.contains("More listings"));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1, 100).chars().count(), 1);
    }
}
