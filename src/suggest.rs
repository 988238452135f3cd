//! Keyword suggestions for the search box.

/// Common job titles offered as search suggestions.
pub const COMMON_KEYWORDS: &[&str] = &[
    "Software Developer",
    "Data Analyst",
    "Product Manager",
    "Designer",
    "Marketing Manager",
    "Sales Representative",
    "Customer Support",
    "DevOps Engineer",
    "Full Stack Developer",
    "Frontend Developer",
    "Backend Developer",
    "Mobile Developer",
    "QA Engineer",
];

/// Titles containing `query`, ignoring case. An empty query matches nothing.
pub fn suggestions(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    COMMON_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| keyword.to_lowercase().contains(&query))
        .collect()
}
