//! Salary normalization, formatting, and distribution statistics.

use crate::models::{JobListing, Salary, SalaryBucket, SalaryStats};

/// Number of equal-width buckets in the salary histogram.
pub const SALARY_BUCKETS: usize = 6;

/// Build a normalized salary from the raw min/max fields.
///
/// Non-positive values count as missing. With both present the average is
/// their midpoint; with only one present it stands for min, max and average.
pub fn process_salary(min: Option<f64>, max: Option<f64>) -> Option<Salary> {
    let min = min.filter(|v| v.is_finite() && *v > 0.0);
    let max = max.filter(|v| v.is_finite() && *v > 0.0);

    match (min, max) {
        (Some(lo), Some(hi)) => Some(Salary {
            min: lo,
            max: hi,
            average: (lo + hi) / 2.0,
            formatted: format_salary(lo, Some(hi)),
        }),
        (Some(value), None) | (None, Some(value)) => Some(Salary {
            min: value,
            max: value,
            average: value,
            formatted: format_salary(value, None),
        }),
        (None, None) => None,
    }
}

/// Compact display form of an amount: `1.2M`, `85K`, or the plain number.
pub fn format_amount(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.0}K", amount / 1_000.0)
    } else if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        let text = format!("{:.2}", amount);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a salary or salary range with a currency sign.
pub fn format_salary(min: f64, max: Option<f64>) -> String {
    match max {
        Some(max) if max != min => {
            format!("${} - ${}", format_amount(min), format_amount(max))
        }
        _ => format!("${}", format_amount(min)),
    }
}

/// Compute salary statistics over the per-job averages.
///
/// Returns `None` when no job carries salary information.
pub fn salary_stats(jobs: &[JobListing]) -> Option<SalaryStats> {
    let mut salaries: Vec<f64> = jobs
        .iter()
        .filter_map(|job| job.salary.as_ref().map(|s| s.average))
        .collect();

    if salaries.is_empty() {
        return None;
    }

    salaries.sort_by(|a, b| a.total_cmp(b));

    let count = salaries.len();
    let min = salaries[0];
    let max = salaries[count - 1];
    let average = salaries.iter().sum::<f64>() / count as f64;
    let median = salaries[count / 2];

    Some(SalaryStats {
        count,
        min,
        max,
        average,
        median,
        distribution: salary_distribution(&salaries),
    })
}

/// Split salaries into equal-width buckets spanning `[min, max]`.
///
/// A value on the upper boundary lands in the last bucket. When every salary
/// is identical the range is empty and all of them go to the first bucket.
pub fn salary_distribution(salaries: &[f64]) -> Vec<SalaryBucket> {
    if salaries.is_empty() {
        return Vec::new();
    }

    let min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
    let max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bucket_size = (max - min) / SALARY_BUCKETS as f64;

    let mut buckets: Vec<SalaryBucket> = (0..SALARY_BUCKETS)
        .map(|i| {
            let lo = min + i as f64 * bucket_size;
            let hi = min + (i + 1) as f64 * bucket_size;
            SalaryBucket {
                range: format!("{} - {}", format_salary(lo, None), format_salary(hi, None)),
                count: 0,
                min: lo,
                max: hi,
            }
        })
        .collect();

    for &salary in salaries {
        let index = if bucket_size > 0.0 {
            (((salary - min) / bucket_size).floor() as usize).min(SALARY_BUCKETS - 1)
        } else {
            0
        };
        buckets[index].count += 1;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with_salary(average: Option<f64>) -> JobListing {
        JobListing {
            id: "1".to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: "London".to_string(),
            salary: average.and_then(|a| process_salary(Some(a), None)),
            description: String::new(),
            url: String::new(),
            created: None,
            contract_type: "permanent".to_string(),
            category: "IT Jobs".to_string(),
        }
    }

    #[test]
    fn test_process_salary_range() {
        let salary = process_salary(Some(80000.0), Some(100000.0)).unwrap();
        assert_eq!(salary.min, 80000.0);
        assert_eq!(salary.max, 100000.0);
        assert_eq!(salary.average, 90000.0);
        assert_eq!(salary.formatted, "$80K - $100K");
    }

    #[test]
    fn test_process_salary_single_bound() {
        let only_min = process_salary(Some(45000.0), None).unwrap();
        assert_eq!(only_min.average, 45000.0);
        assert_eq!(only_min.formatted, "$45K");

        let only_max = process_salary(Some(0.0), Some(60000.0)).unwrap();
        assert_eq!(only_max.min, 60000.0);
        assert_eq!(only_max.average, 60000.0);

        assert!(process_salary(None, None).is_none());
        assert!(process_salary(Some(0.0), Some(-5.0)).is_none());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_500_000.0), "1.5M");
        assert_eq!(format_amount(87_600.0), "88K");
        assert_eq!(format_amount(1_000.0), "1K");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(12.5), "12.5");
    }

    #[test]
    fn test_format_salary_equal_bounds() {
        assert_eq!(format_salary(50000.0, Some(50000.0)), "$50K");
        assert_eq!(format_salary(50000.0, None), "$50K");
    }

    #[test]
    fn test_stats_none_without_salaries() {
        let jobs = vec![job_with_salary(None), job_with_salary(None)];
        assert!(salary_stats(&jobs).is_none());
    }

    #[test]
    fn test_stats_mean_median_bounds() {
        let jobs: Vec<JobListing> = [40000.0, 10000.0, 30000.0, 20000.0]
            .iter()
            .map(|s| job_with_salary(Some(*s)))
            .chain(std::iter::once(job_with_salary(None)))
            .collect();

        let stats = salary_stats(&jobs).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 10000.0);
        assert_eq!(stats.max, 40000.0);
        assert_eq!(stats.average, 25000.0);
        // sorted: 10k 20k 30k 40k, index floor(4/2) = 2
        assert_eq!(stats.median, 30000.0);
    }

    #[test]
    fn test_histogram_counts_sum_to_known_salaries() {
        let jobs: Vec<JobListing> = [30000.0, 42000.0, 55000.0, 61000.0, 75000.0, 90000.0, 90000.0]
            .iter()
            .map(|s| job_with_salary(Some(*s)))
            .chain(std::iter::once(job_with_salary(None)))
            .collect();

        let stats = salary_stats(&jobs).unwrap();
        assert_eq!(stats.distribution.len(), SALARY_BUCKETS);
        let total: usize = stats.distribution.iter().map(|b| b.count).sum();
        assert_eq!(total, stats.count);
        assert_eq!(total, 7);
    }

    #[test]
    fn test_histogram_upper_boundary_in_last_bucket() {
        let buckets = salary_distribution(&[0.0, 60.0]);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets[5].max, 60.0);

        // 10.0 sits exactly on the boundary between the first two buckets
        let buckets = salary_distribution(&[0.0, 10.0, 60.0]);
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let buckets = salary_distribution(&[50000.0, 50000.0, 50000.0]);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(buckets[0].range, "$50K - $50K");
    }

    #[test]
    fn test_bucket_labels() {
        let buckets = salary_distribution(&[60000.0, 120000.0]);
        assert_eq!(buckets[0].range, "$60K - $70K");
        assert_eq!(buckets[5].range, "$110K - $120K");
    }
}
