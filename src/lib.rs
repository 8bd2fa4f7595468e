pub mod cli;
pub mod config;

// Re-export component crates for convenience
pub use vulnsift_core::{ChangesDocument, Match, VulnerabilityEntry};
pub use vulnsift_filter::{Allowlist, FilterOutcome};
