//! Job aggregation and statistics.
//!
//! This module turns a list of normalized postings into the frequency
//! tables and skill-demand counts shown in reports.

use crate::analysis::salary::salary_stats;
use crate::models::{
    FrequencyEntry, FrequencyStats, JobListing, SearchResult, SkillDemand, UNKNOWN_COMPANY,
};
use std::collections::HashMap;

/// Maximum rows kept in any top-N table.
pub const TOP_N: usize = 10;

/// Skill keywords searched for in titles and descriptions.
pub const SKILL_KEYWORDS: &[&str] = &[
    "JavaScript",
    "Python",
    "Java",
    "React",
    "Node.js",
    "SQL",
    "AWS",
    "Docker",
    "Kubernetes",
    "Git",
    "HTML",
    "CSS",
    "Angular",
    "Vue.js",
    "MongoDB",
    "PostgreSQL",
    "Redis",
    "Elasticsearch",
    "GraphQL",
    "TypeScript",
    "Go",
    "Rust",
    "Swift",
    "Kotlin",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Scala",
    "R",
    "MATLAB",
    "Tableau",
    "PowerBI",
    "Machine Learning",
    "AI",
    "Data Science",
    "DevOps",
    "Agile",
];

/// Counts occurrences while remembering first-seen order, so that ties in
/// the ranked output are deterministic.
#[derive(Debug, Default)]
struct FrequencyCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl FrequencyCounter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Entries sorted by descending count, truncated to `n`.
    fn ranked(mut self, n: usize) -> Vec<(String, usize)> {
        // stable: equal counts keep insertion order
        self.counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        self.counts.truncate(n);
        self.counts
    }
}

fn frequency_stats(counter: FrequencyCounter, total_jobs: usize) -> FrequencyStats {
    let total = counter.distinct();
    let top = counter
        .ranked(TOP_N)
        .into_iter()
        .map(|(name, count)| FrequencyEntry {
            name,
            count,
            percentage: percentage(count, total_jobs),
        })
        .collect();

    FrequencyStats { top, total }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Frequency table of job locations.
pub fn location_stats(jobs: &[JobListing]) -> FrequencyStats {
    let mut counter = FrequencyCounter::default();
    for job in jobs {
        counter.add(&job.location);
    }
    frequency_stats(counter, jobs.len())
}

/// Frequency table of hiring companies.
///
/// Postings without a company name are left out of the counts but still
/// contribute to the percentage denominator.
pub fn company_stats(jobs: &[JobListing]) -> FrequencyStats {
    let mut counter = FrequencyCounter::default();
    for job in jobs.iter().filter(|j| j.company != UNKNOWN_COMPANY) {
        counter.add(&job.company);
    }
    frequency_stats(counter, jobs.len())
}

/// Count postings mentioning each skill keyword (case-insensitive substring
/// match on title and description). A posting counts once per skill.
pub fn skill_stats(jobs: &[JobListing]) -> Vec<SkillDemand> {
    let needles: Vec<(&str, String)> = SKILL_KEYWORDS
        .iter()
        .map(|skill| (*skill, skill.to_lowercase()))
        .collect();

    let mut counter = FrequencyCounter::default();
    for job in jobs {
        let text = format!("{} {}", job.title, job.description).to_lowercase();
        for (skill, needle) in &needles {
            if text.contains(needle.as_str()) {
                counter.add(skill);
            }
        }
    }

    counter
        .ranked(TOP_N)
        .into_iter()
        .map(|(name, demand)| SkillDemand { name, demand })
        .collect()
}

/// Assemble a full search result from normalized postings.
///
/// `reported_total` is the API's total match count; when absent or zero the
/// number of postings is used.
pub fn build_search_result(reported_total: Option<u64>, jobs: Vec<JobListing>) -> SearchResult {
    let total_jobs = reported_total
        .filter(|t| *t > 0)
        .unwrap_or(jobs.len() as u64);

    SearchResult {
        total_jobs,
        salary_stats: salary_stats(&jobs),
        location_stats: location_stats(&jobs),
        company_stats: company_stats(&jobs),
        skill_stats: skill_stats(&jobs),
        jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::salary::process_salary;

    fn create_test_job(company: &str, location: &str, title: &str, description: &str) -> JobListing {
        JobListing {
            id: format!("{}-{}", company, location),
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            salary: None,
            description: description.to_string(),
            url: "https://example.com/job".to_string(),
            created: None,
            contract_type: "Not specified".to_string(),
            category: "General".to_string(),
        }
    }

    #[test]
    fn test_location_stats_ranking_and_percentage() {
        let jobs = vec![
            create_test_job("A", "Leeds", "", ""),
            create_test_job("B", "London", "", ""),
            create_test_job("C", "London", "", ""),
            create_test_job("D", "Bristol", "", ""),
            create_test_job("E", "London", "", ""),
        ];

        let stats = location_stats(&jobs);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.top[0].name, "London");
        assert_eq!(stats.top[0].count, 3);
        assert_eq!(stats.top[0].percentage, 60.0);
        // Leeds and Bristol tie; first seen wins
        assert_eq!(stats.top[1].name, "Leeds");
        assert_eq!(stats.top[2].name, "Bristol");
    }

    #[test]
    fn test_top_ten_cap() {
        let jobs: Vec<JobListing> = (0..15)
            .map(|i| create_test_job("Acme", &format!("City {}", i), "", ""))
            .collect();

        let stats = location_stats(&jobs);
        assert_eq!(stats.total, 15);
        assert_eq!(stats.top.len(), TOP_N);
    }

    #[test]
    fn test_company_stats_skip_placeholder() {
        let jobs = vec![
            create_test_job(UNKNOWN_COMPANY, "Leeds", "", ""),
            create_test_job(UNKNOWN_COMPANY, "Leeds", "", ""),
            create_test_job("Globex", "Leeds", "", ""),
            create_test_job("Initech", "Leeds", "", ""),
        ];

        let stats = company_stats(&jobs);
        assert_eq!(stats.total, 2);
        assert!(stats.top.iter().all(|e| e.name != UNKNOWN_COMPANY));
        assert_eq!(stats.top[0].percentage, 25.0);
    }

    #[test]
    fn test_skill_stats_case_insensitive_once_per_job() {
        let jobs = vec![
            create_test_job("A", "X", "Senior PYTHON Engineer", "python, python and docker"),
            create_test_job("B", "X", "Backend developer", "Kubernetes and Docker"),
            create_test_job("C", "X", "Designer", "Figma"),
        ];

        let skills = skill_stats(&jobs);
        let demand = |name: &str| skills.iter().find(|s| s.name == name).map(|s| s.demand);

        assert_eq!(demand("Python"), Some(1));
        assert_eq!(demand("Docker"), Some(2));
        assert_eq!(demand("Kubernetes"), Some(1));
        assert!(skills.windows(2).all(|w| w[0].demand >= w[1].demand));
        assert!(skills.len() <= TOP_N);
    }

    #[test]
    fn test_skill_stats_empty() {
        assert!(skill_stats(&[]).is_empty());
    }

    #[test]
    fn test_build_search_result() {
        let mut jobs = vec![
            create_test_job("Globex", "Leeds", "Rust developer", ""),
            create_test_job("Globex", "York", "Go developer", ""),
        ];
        jobs[0].salary = process_salary(Some(50000.0), Some(70000.0));

        let result = build_search_result(Some(250), jobs.clone());
        assert_eq!(result.total_jobs, 250);
        assert_eq!(result.jobs.len(), 2);
        assert_eq!(result.salary_stats.as_ref().map(|s| s.count), Some(1));
        assert_eq!(result.company_stats.leader(), Some("Globex"));

        let fallback = build_search_result(None, jobs);
        assert_eq!(fallback.total_jobs, 2);
    }
}
