//! JSON and CSV export of search results.

use crate::models::{JobListing, SearchResult};
use anyhow::{Context, Result};
use chrono::{NaiveDate, SecondsFormat};
use std::path::{Path, PathBuf};

/// Fixed CSV header.
pub const CSV_HEADER: [&str; 8] = [
    "Title",
    "Company",
    "Location",
    "Salary Min",
    "Salary Max",
    "Contract Type",
    "Created Date",
    "URL",
];

/// Pretty-printed JSON of the whole result set.
pub fn export_json(result: &SearchResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(Into::into)
}

fn amount_field(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// CSV of the job listings, one row per posting.
///
/// Fields are quoted only when needed; embedded quotes are doubled.
pub fn export_csv(jobs: &[JobListing]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for job in jobs {
        let created = job
            .created
            .map(|c| c.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();
        let salary_min = amount_field(job.salary.as_ref().map(|s| s.min));
        let salary_max = amount_field(job.salary.as_ref().map(|s| s.max));

        writer.write_record([
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            salary_min.as_str(),
            salary_max.as_str(),
            job.contract_type.as_str(),
            created.as_str(),
            job.url.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Default export file name, e.g. `job-market-data-2024-06-01.csv`.
pub fn default_export_name(date: NaiveDate, extension: &str) -> PathBuf {
    PathBuf::from(format!("job-market-data-{}.{}", date.format("%Y-%m-%d"), extension))
}

/// Write export content to a file.
pub fn write_export(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write export to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_search_result, process_salary};
    use chrono::{TimeZone, Utc};

    fn create_test_job(title: &str, salary: Option<(f64, f64)>) -> JobListing {
        JobListing {
            id: "1".to_string(),
            title: title.to_string(),
            company: "Acme, Inc".to_string(),
            location: "London".to_string(),
            salary: salary.and_then(|(lo, hi)| process_salary(Some(lo), Some(hi))),
            description: "desc".to_string(),
            url: "https://example.com/jobs?id=1".to_string(),
            created: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
            contract_type: "permanent".to_string(),
            category: "IT Jobs".to_string(),
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let jobs = vec![
            create_test_job("Rust Engineer", Some((60000.0, 80000.0))),
            create_test_job("Tester", None),
        ];
        let csv = export_csv(&jobs).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Title,Company,Location,Salary Min,Salary Max,Contract Type,Created Date,URL"
        );
        assert_eq!(
            lines[1],
            "Rust Engineer,\"Acme, Inc\",London,60000,80000,permanent,2024-05-01T09:30:00Z,https://example.com/jobs?id=1"
        );
        assert!(lines[2].starts_with("Tester,\"Acme, Inc\",London,,,permanent,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_doubles_embedded_quotes() {
        let jobs = vec![create_test_job("Senior \"Rust\" Dev", None)];
        let csv = export_csv(&jobs).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Senior \"\"Rust\"\" Dev\","));
    }

    #[test]
    fn test_csv_parses_back() {
        let jobs = vec![create_test_job("Line\nbreak \"quoted\"", Some((1.0, 2.5)))];
        let csv = export_csv(&jobs).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Line\nbreak \"quoted\"");
        assert_eq!(&record[4], "2.5");
        assert_eq!(record.len(), CSV_HEADER.len());
    }

    #[test]
    fn test_export_json_pretty() {
        let result = build_search_result(Some(5), vec![create_test_job("Rust", None)]);
        let json = export_json(&result).unwrap();

        assert!(json.contains("\n  \"totalJobs\": 5"));
        assert!(json.contains("\"contractType\": \"permanent\""));
        assert!(json.contains("\"salaryStats\": null"));
    }

    #[test]
    fn test_default_export_name() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            default_export_name(date, "csv"),
            PathBuf::from("job-market-data-2024-06-01.csv")
        );
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_export(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
