//! Report and export writers.

pub mod export;
pub mod generator;

pub use export::{default_export_name, export_csv, export_json, write_export};
pub use generator::{average_salary_label, format_count, generate_markdown_report};
