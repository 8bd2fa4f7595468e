//! Markdown tables of vulnerable dependency changes.

use std::collections::{BTreeSet, HashMap};

use vulnsift_core::VulnerabilityEntry;

use crate::badge::{change_rank, severity_badge};

const UNKNOWN: &str = "(unknown)";
const NO_CHANGES: &str = "> No vulnerable changes detected.";

/// Escape pipe characters so a value cannot break a table row.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// A vulnerability listed under a grouped package row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowVulnerability {
    pub id: Option<String>,
    pub severity: Option<String>,
}

impl RowVulnerability {
    fn id_label(&self) -> &str {
        self.id.as_deref().unwrap_or(UNKNOWN)
    }
}

/// All entries for one package, regardless of version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedChangeRow {
    /// Lowercase package name used for grouping and ordering.
    pub key: String,
    /// Package name as first seen in the input.
    pub package: String,
    pub versions: BTreeSet<String>,
    /// Last non-empty ecosystem seen for the package.
    pub ecosystem: Option<String>,
    pub vulnerabilities: Vec<RowVulnerability>,
}

impl GroupedChangeRow {
    fn new(key: String, package: String) -> Self {
        Self {
            key,
            package,
            versions: BTreeSet::new(),
            ecosystem: None,
            vulnerabilities: Vec::new(),
        }
    }

    /// Most severe first, then by id.
    fn sort_vulnerabilities(&mut self) {
        self.vulnerabilities.sort_by(|a, b| {
            change_rank(b.severity.as_deref())
                .cmp(&change_rank(a.severity.as_deref()))
                .then_with(|| a.id_label().cmp(b.id_label()))
                .then_with(|| a.severity.cmp(&b.severity))
        });
    }

    fn render(&self) -> String {
        let versions = if self.versions.is_empty() {
            UNKNOWN.to_string()
        } else {
            self.versions.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let vulnerabilities = self
            .vulnerabilities
            .iter()
            .map(|v| format!("{} `{}`", severity_badge(v.severity.as_deref()), v.id_label()))
            .collect::<Vec<_>>()
            .join("<br>");

        format!(
            "| {} | {} | {} | {} |",
            escape_cell(&self.package),
            escape_cell(&versions),
            escape_cell(self.ecosystem.as_deref().unwrap_or(UNKNOWN)),
            escape_cell(&vulnerabilities),
        )
    }
}

/// Group entries by lowercase package name, ordered by that name.
pub fn group_changes(entries: &[VulnerabilityEntry]) -> Vec<GroupedChangeRow> {
    let mut rows: HashMap<String, GroupedChangeRow> = HashMap::new();

    for entry in entries {
        let name = entry.package().or_else(|| entry.package_id()).unwrap_or(UNKNOWN);
        let key = name.to_lowercase();
        let row = rows
            .entry(key.clone())
            .or_insert_with(|| GroupedChangeRow::new(key, name.to_string()));

        if let Some(version) = entry.version() {
            row.versions.insert(version.to_string());
        }
        if let Some(ecosystem) = entry.ecosystem() {
            row.ecosystem = Some(ecosystem.to_string());
        }
        row.vulnerabilities.push(RowVulnerability {
            id: entry.vuln_id().map(str::to_string),
            severity: entry.severity().map(str::to_string),
        });
    }

    let mut rows: Vec<GroupedChangeRow> = rows.into_values().collect();
    for row in &mut rows {
        row.sort_vulnerabilities();
    }
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// Render the grouped-by-package table.
pub fn to_markdown(entries: &[VulnerabilityEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![NO_CHANGES.to_string()];
    }

    let mut lines = vec![
        "| Package | Versions | Ecosystem | Vulnerabilities |".to_string(),
        "| --- | --- | --- | --- |".to_string(),
    ];
    lines.extend(group_changes(entries).iter().map(GroupedChangeRow::render));
    lines
}

/// Render one row per entry. Kept for pipelines that still expect the
/// ungrouped layout.
pub fn to_flat_markdown(entries: &[VulnerabilityEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec![NO_CHANGES.to_string()];
    }

    let mut lines = vec![
        "| Package | Version | Ecosystem | Vulnerability | Severity |".to_string(),
        "| --- | --- | --- | --- | --- |".to_string(),
    ];
    for entry in entries {
        let cells = [
            entry.package(),
            entry.version(),
            entry.ecosystem(),
            entry.vuln_id(),
            entry.severity(),
        ]
        .map(|value| escape_cell(value.unwrap_or(UNKNOWN)));
        lines.push(format!("| {} |", cells.join(" | ")));
    }
    lines
}
