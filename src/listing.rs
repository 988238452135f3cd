//! Sorting, pagination and display helpers for the job listing.

use crate::models::{JobListing, SortBy};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Sort jobs in place.
///
/// Dates and salaries sort highest first (undated jobs last, jobs without a
/// salary count as zero); company and location sort A-Z ignoring case.
/// `reverse` flips the whole ordering.
pub fn sort_jobs(jobs: &mut [JobListing], sort_by: SortBy, reverse: bool) {
    jobs.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare(a: &JobListing, b: &JobListing, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Date => match (a.created, b.created) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortBy::Salary => {
            let avg = |j: &JobListing| j.salary.as_ref().map_or(0.0, |s| s.average);
            avg(b).total_cmp(&avg(a))
        }
        SortBy::Company => text_cmp(&a.company, &b.company),
        SortBy::Location => text_cmp(&a.location, &b.location),
    }
}

fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// One page of the listing.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub items: &'a [JobListing],
    /// Current page, 1-based.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Page<'_> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice out page `page` (1-based), clamping it into the valid range.
pub fn paginate(jobs: &[JobListing], page: usize, per_page: usize) -> Page<'_> {
    let per_page = per_page.max(1);
    let total_items = jobs.len();
    let total_pages = total_items.div_ceil(per_page);
    let number = page.clamp(1, total_pages.max(1));

    let start = ((number - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);

    Page {
        items: &jobs[start..end],
        number,
        total_pages,
        total_items,
    }
}

/// Relative age label for a posting date.
pub fn time_ago(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "Recently".to_string();
    };

    let days = (now - created).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < 30 => format!("{} weeks ago", d / 7),
        d => format!("{} months ago", d / 30),
    }
}
