//! Digest of a Grype report: severity histogram and highest-priority packages.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use vulnsift_core::{non_empty, Match};

/// Canonical report severity order, most severe first.
pub const SEVERITY_ORDER: [&str; 6] = ["Critical", "High", "Medium", "Low", "Negligible", "Unknown"];

/// Packages listed in the comment table.
const TOP_PACKAGES: usize = 5;

/// Position in [`SEVERITY_ORDER`]; unrecognised labels sort after all of them.
pub fn report_severity_rank(label: &str) -> usize {
    SEVERITY_ORDER
        .iter()
        .position(|known| *known == label)
        .unwrap_or(SEVERITY_ORDER.len())
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// All matches for one exact `name@version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub name: String,
    pub version: String,
    pub severities: BTreeSet<String>,
    pub ids: BTreeSet<String>,
}

impl PackageSummary {
    /// Rank of the most severe severity seen for the package.
    pub fn best_rank(&self) -> usize {
        self.severities
            .iter()
            .map(|s| report_severity_rank(s))
            .min()
            .unwrap_or_else(|| report_severity_rank("Unknown"))
    }

    fn severity_cell(&self) -> String {
        // The set is already alphabetical; the stable sort keeps that for equal ranks.
        let mut severities: Vec<&String> = self.severities.iter().collect();
        severities.sort_by_key(|s| report_severity_rank(s));
        severities
            .into_iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn ids_cell(&self) -> String {
        if self.ids.is_empty() {
            return "-".to_string();
        }
        self.ids.iter().map(String::as_str).collect::<Vec<_>>().join("<br>")
    }
}

/// Packages in first-seen order plus a per-match severity histogram.
#[derive(Debug, Clone, Default)]
pub struct ReportDigest {
    pub packages: Vec<PackageSummary>,
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
}

pub fn summarize_packages(matches: &[Match]) -> ReportDigest {
    let mut digest = ReportDigest {
        total: matches.len(),
        ..Default::default()
    };
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in matches {
        let severity = capitalize(non_empty(&m.vulnerability.severity).unwrap_or("Unknown"));
        *digest.counts.entry(severity.clone()).or_insert(0) += 1;

        let name = m.artifact.name();
        let version = m.artifact.version();
        let key = format!("{}@{}", name, version);

        let slot = *index.entry(key).or_insert_with(|| {
            digest.packages.push(PackageSummary {
                name: name.to_string(),
                version: version.to_string(),
                severities: BTreeSet::new(),
                ids: BTreeSet::new(),
            });
            digest.packages.len() - 1
        });
        let package = &mut digest.packages[slot];
        package.severities.insert(severity);
        package.ids.insert(m.vulnerability.display_id().to_string());
    }

    digest
}

/// Most severe packages first; more distinct vulnerabilities break ties.
pub fn select_top_packages(packages: &[PackageSummary]) -> Vec<&PackageSummary> {
    let mut ranked: Vec<&PackageSummary> = packages.iter().collect();
    // Stable sort keeps first-seen order for full ties.
    ranked.sort_by_key(|p| (p.best_rank(), std::cmp::Reverse(p.ids.len())));
    ranked.truncate(TOP_PACKAGES);
    ranked
}

/// Summary lines for the step summary and the top of the comment.
pub fn format_summary(digest: &ReportDigest, fail_on: &str, commit: &str) -> Vec<String> {
    let mut lines = vec![
        "## Grype Scan Summary".to_string(),
        format!("- Commit: `{}`", commit),
        format!("- Failure threshold: {} and above", fail_on),
        format!("- Total matches: {}", digest.total),
    ];

    if digest.total > 0 {
        lines.push(String::new());
        lines.push("### Severity breakdown".to_string());
        for severity in SEVERITY_ORDER {
            if let Some(count) = digest.counts.get(severity).filter(|c| **c > 0) {
                lines.push(format!("- {}: {}", severity, count));
            }
        }
    }

    lines
}

/// Full PR comment body, newline-terminated.
pub fn format_comment(summary_lines: &[String], top: &[&PackageSummary], has_matches: bool) -> String {
    let mut lines = summary_lines.to_vec();
    lines.push(String::new());

    if has_matches {
        lines.push(format!("### 📦 Highest-priority packages (up to {})", TOP_PACKAGES));
        lines.push("| Package | Version | Severity | Vulnerability IDs |".to_string());
        lines.push("| ------- | ------- | -------- | ----------------- |".to_string());
        for package in top {
            lines.push(format!(
                "| `{}` | `{}` | {} | {} |",
                package.name,
                package.version,
                package.severity_cell(),
                package.ids_cell()
            ));
        }
    } else {
        lines.push("✅ No vulnerabilities at or above the threshold were detected.".to_string());
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push("*This comment was generated automatically from the Grype report*".to_string());
    lines.join("\n") + "\n"
}
