//! The subset of the Grype JSON report that vulnsift reads.

use serde::{Deserialize, Serialize};

use crate::entry::non_empty;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrypeReport {
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// A single vulnerability matched against a single artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub vulnerability: MatchVulnerability,
    #[serde(default)]
    pub artifact: MatchArtifact,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchVulnerability {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "dataSource")]
    pub data_source: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchArtifact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl MatchVulnerability {
    /// Identifier shown for this vulnerability: id, then data source, then `N/A`.
    pub fn display_id(&self) -> &str {
        non_empty(&self.id)
            .or_else(|| non_empty(&self.data_source))
            .unwrap_or("N/A")
    }
}

impl MatchArtifact {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}
