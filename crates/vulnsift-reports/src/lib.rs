//! Report generation for vulnsift.
//!
//! This crate provides the Markdown outputs:
//! - Grype report summaries and PR comment bodies
//! - Grouped (and legacy flat) tables of vulnerable changes
//! - Output file helpers for CI step summaries and pipeline outputs

pub mod badge;
pub mod markdown;
pub mod output;
pub mod summary;

pub use badge::{severity_badge, ChangeSeverity};
pub use markdown::{
    escape_cell, group_changes, to_flat_markdown, to_markdown, GroupedChangeRow, RowVulnerability,
};
pub use output::{append_lines, ensure_parent_dir, write_lines, write_pipeline_outputs, write_text};
pub use summary::{
    capitalize, format_comment, format_summary, report_severity_rank, select_top_packages,
    summarize_packages, PackageSummary, ReportDigest, SEVERITY_ORDER,
};
