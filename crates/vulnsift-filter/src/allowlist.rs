//! Allowlist tokens and the lookup keys derived from an entry.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vulnsift_core::VulnerabilityEntry;

/// Number of tokens shown when the allowlist is logged.
const PREVIEW_LEN: usize = 20;

/// A set of normalized (lowercase) allowlist tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    tokens: BTreeSet<String>,
}

impl Allowlist {
    /// Build from allowlist file lines.
    ///
    /// Blank lines and `#` comments are skipped. Each remaining line adds the
    /// whole line, its last colon-delimited segment and its last two segments
    /// (`group:artifact`).
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = BTreeSet::new();
        for raw in lines {
            let line = raw.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let normalized = line.to_lowercase();
            let parts: Vec<&str> = normalized.split(':').filter(|p| !p.is_empty()).collect();

            if let Some(last) = parts.last() {
                tokens.insert(last.to_string());
            }
            if parts.len() >= 2 {
                tokens.insert(format!("{}:{}", parts[parts.len() - 2], parts[parts.len() - 1]));
            }
            tokens.insert(normalized);
        }
        Self { tokens }
    }

    /// Load an allowlist file.
    ///
    /// No path, or a path that does not exist, yields an empty allowlist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            log::debug!("Allowlist file not found: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read allowlist {}", path.display()))?;
        let allowlist = Self::from_lines(content.lines());

        log::debug!(
            "Loaded {} allowlist entries from {}: {}",
            allowlist.len(),
            path.display(),
            allowlist.preview()
        );
        Ok(allowlist)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tokens.contains(key)
    }

    /// Whether any of `keys` is allowlisted.
    pub fn matches_any<'a>(&self, keys: impl IntoIterator<Item = &'a String>) -> bool {
        keys.into_iter().any(|key| self.tokens.contains(key))
    }

    fn preview(&self) -> String {
        self.tokens
            .iter()
            .take(PREVIEW_LEN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Lowercase lookup keys under which an entry may appear in an allowlist.
pub fn candidate_keys(entry: &VulnerabilityEntry) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();

    let package = entry.package();
    let package_id = entry.package_id();
    let artifact = entry.artifact();
    let ecosystem = entry.ecosystem();

    for value in [package, package_id, artifact].into_iter().flatten() {
        keys.insert(value.to_lowercase());
        if let Some(ecosystem) = ecosystem {
            keys.insert(format!("{}:{}", ecosystem, value).to_lowercase());
        }
    }

    if let (Some(group), Some(artifact)) = (entry.group(), artifact) {
        keys.insert(format!("{}:{}", group, artifact).to_lowercase());
        if let Some(ecosystem) = ecosystem {
            keys.insert(format!("{}:{}:{}", ecosystem, group, artifact).to_lowercase());
        }
    }

    keys
}
