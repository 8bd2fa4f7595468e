//! Allowlist and severity filtering for vulnerable dependency changes.
//!
//! When an allowlist is active, only entries whose package identity matches
//! an allowlist token are kept. Otherwise entries are kept when their
//! severity reaches the configured minimum.

pub mod allowlist;
pub mod filter;
pub mod severity;

pub use allowlist::{candidate_keys, Allowlist};
pub use filter::{filter_entries, FilterOutcome, FilterSummary};
pub use severity::{meets_severity, severity_rank};
