//! Core types for vulnsift.
//!
//! This crate provides the data model shared by the vulnsift components:
//! - Vulnerable dependency changes (VulnerabilityEntry, ChangesDocument)
//! - Grype report matches (GrypeReport, Match)
//! - Input loading and load errors

mod entry;
mod error;
mod grype;
mod load;

pub use entry::{non_empty, ChangesDocument, VulnerabilityEntry};
pub use error::LoadError;
pub use grype::{GrypeReport, Match, MatchArtifact, MatchVulnerability};
pub use load::{load_changes, load_matches};
