//! Vulnerable dependency change entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One flagged (dependency, vulnerability) pairing.
///
/// Every field is optional. Anything this type does not hold as a string is
/// kept in `extra`, including unknown fields and known fields given as an
/// explicit `null` or a non-string value, so an entry written back out is
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct VulnerabilityEntry {
    pub package: Option<String>,
    pub package_id: Option<String>,
    pub ecosystem: Option<String>,
    pub group: Option<String>,
    pub artifact: Option<String>,
    pub version: Option<String>,
    pub vuln_id: Option<String>,
    pub severity: Option<String>,
    pub extra: Map<String, Value>,
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        Some(other) => {
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

impl From<Map<String, Value>> for VulnerabilityEntry {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            package: take_string(&mut map, "package"),
            package_id: take_string(&mut map, "package_id"),
            ecosystem: take_string(&mut map, "ecosystem"),
            group: take_string(&mut map, "group"),
            artifact: take_string(&mut map, "artifact"),
            version: take_string(&mut map, "version"),
            vuln_id: take_string(&mut map, "vuln_id"),
            severity: take_string(&mut map, "severity"),
            extra: map,
        }
    }
}

impl From<VulnerabilityEntry> for Map<String, Value> {
    fn from(entry: VulnerabilityEntry) -> Self {
        let mut map = entry.extra;
        let known = [
            ("package", entry.package),
            ("package_id", entry.package_id),
            ("ecosystem", entry.ecosystem),
            ("group", entry.group),
            ("artifact", entry.artifact),
            ("version", entry.version),
            ("vuln_id", entry.vuln_id),
            ("severity", entry.severity),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value));
            }
        }
        map
    }
}

/// Treat empty strings the same as a missing value.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl VulnerabilityEntry {
    pub fn package(&self) -> Option<&str> {
        non_empty(&self.package)
    }

    pub fn package_id(&self) -> Option<&str> {
        non_empty(&self.package_id)
    }

    pub fn ecosystem(&self) -> Option<&str> {
        non_empty(&self.ecosystem)
    }

    pub fn group(&self) -> Option<&str> {
        non_empty(&self.group)
    }

    /// The artifact name, falling back to the package name.
    pub fn artifact(&self) -> Option<&str> {
        non_empty(&self.artifact).or_else(|| self.package())
    }

    pub fn version(&self) -> Option<&str> {
        non_empty(&self.version)
    }

    pub fn vuln_id(&self) -> Option<&str> {
        non_empty(&self.vuln_id)
    }

    pub fn severity(&self) -> Option<&str> {
        non_empty(&self.severity)
    }

    /// Name used in log lines: package id, then package, then `unknown`.
    pub fn display_name(&self) -> &str {
        self.package_id().or_else(|| self.package()).unwrap_or("unknown")
    }
}

/// A document carrying a `vulnerable_changes` list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangesDocument {
    #[serde(default)]
    pub vulnerable_changes: Vec<VulnerabilityEntry>,
}
