//! The filtering decision and its summary record.

use serde::{Deserialize, Serialize};
use vulnsift_core::VulnerabilityEntry;

use crate::allowlist::{candidate_keys, Allowlist};
use crate::severity::meets_severity;

/// Counts written alongside the filtered entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub total: usize,
    pub filtered: usize,
    pub min_severity: String,
    pub allowlist_entries: usize,
}

/// The document produced by the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub vulnerable_changes: Vec<VulnerabilityEntry>,
    pub summary: FilterSummary,
}

impl FilterOutcome {
    pub fn build(entries: &[VulnerabilityEntry], allowlist: &Allowlist, min_severity: &str) -> Self {
        let kept = filter_entries(entries, allowlist, min_severity);
        let summary = FilterSummary {
            total: entries.len(),
            filtered: kept.len(),
            min_severity: min_severity.to_string(),
            allowlist_entries: allowlist.len(),
        };
        Self {
            vulnerable_changes: kept,
            summary,
        }
    }

    /// One-line count summary for the console.
    pub fn console_line(&self) -> String {
        format!(
            "[filter-allowlist] Total: {}, Matched: {}, Allowlist entries: {}",
            self.summary.total, self.summary.filtered, self.summary.allowlist_entries
        )
    }
}

/// Keep the entries that pass the allowlist, or the severity threshold when
/// the allowlist is empty. Input order is preserved.
pub fn filter_entries(
    entries: &[VulnerabilityEntry],
    allowlist: &Allowlist,
    min_severity: &str,
) -> Vec<VulnerabilityEntry> {
    let allowlist_active = !allowlist.is_empty();
    let mut kept = Vec::new();

    for entry in entries {
        let name = entry.display_name();
        let severity = entry.severity();

        if allowlist_active {
            let keys = candidate_keys(entry);
            let matched = allowlist.matches_any(&keys);
            log::debug!(
                "Evaluate {}: severity={:?}, keys={:?}, matched={}",
                name,
                severity,
                keys,
                matched
            );
            if !matched {
                continue;
            }
        } else if !meets_severity(severity, min_severity) {
            log::debug!("Skip {}: severity {:?} < min {}", name, severity, min_severity);
            continue;
        }

        kept.push(entry.clone());
    }

    log::debug!(
        "Entries inspected={}, filtered={}, allowlist_active={}",
        entries.len(),
        kept.len(),
        allowlist_active
    );
    kept
}
