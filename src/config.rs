use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::args::{FilterArgs, SummarizeArgs};
use vulnsift_reports::capitalize;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct VulnsiftConfig {
    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub summarize: SummarizeConfig,
}

/// Settings for `vulnsift filter`
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FilterConfig {
    /// Minimum severity kept when no allowlist is active
    #[serde(default = "default_filter_min_severity")]
    pub min_severity: String,

    /// Allowlist file; a missing file means no allowlist
    pub allowlist: Option<PathBuf>,
}

fn default_filter_min_severity() -> String {
    "critical".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_severity: default_filter_min_severity(),
            allowlist: None,
        }
    }
}

/// Settings for `vulnsift summarize`.
///
/// In CI these normally come from the environment: `GRYPE_REPORT_PATH`,
/// `GRYPE_COMMENT_PATH`, `GITHUB_STEP_SUMMARY`, `GITHUB_OUTPUT`,
/// `FAIL_ON_SEVERITY` and `GITHUB_SHA`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SummarizeConfig {
    /// Grype JSON report (default `grype-report.json`)
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Where the PR comment body is written (default `grype-comment.md`)
    #[serde(default = "default_comment_path")]
    pub comment_path: PathBuf,

    /// Step summary file the summary lines are appended to
    pub step_summary_path: Option<PathBuf>,

    /// Pipeline output file receiving `has_vulns` and `comment_path`
    pub github_output_path: Option<PathBuf>,

    /// Threshold shown in the summary (default `high`)
    #[serde(default = "default_fail_on_severity")]
    pub fail_on_severity: String,

    /// Commit the scan ran against; shown truncated
    #[serde(default)]
    pub commit_sha: String,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("grype-report.json")
}

fn default_comment_path() -> PathBuf {
    PathBuf::from("grype-comment.md")
}

fn default_fail_on_severity() -> String {
    "high".to_string()
}

const SHORT_SHA_LEN: usize = 7;

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            comment_path: default_comment_path(),
            step_summary_path: None,
            github_output_path: None,
            fail_on_severity: default_fail_on_severity(),
            commit_sha: String::new(),
        }
    }
}

impl SummarizeConfig {
    /// Threshold label as displayed, e.g. `High`.
    pub fn fail_on_label(&self) -> String {
        capitalize(&self.fail_on_severity)
    }

    pub fn short_commit(&self) -> String {
        self.commit_sha.chars().take(SHORT_SHA_LEN).collect()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyPath { field: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VulnsiftConfig {
    /// Merge another config into this one (other takes precedence for set values)
    pub fn merge(&mut self, other: &VulnsiftConfig) {
        if other.filter.min_severity != default_filter_min_severity() {
            self.filter.min_severity = other.filter.min_severity.clone();
        }
        if other.filter.allowlist.is_some() {
            self.filter.allowlist = other.filter.allowlist.clone();
        }

        let summarize = &other.summarize;
        if summarize.report_path != default_report_path() {
            self.summarize.report_path = summarize.report_path.clone();
        }
        if summarize.comment_path != default_comment_path() {
            self.summarize.comment_path = summarize.comment_path.clone();
        }
        if summarize.step_summary_path.is_some() {
            self.summarize.step_summary_path = summarize.step_summary_path.clone();
        }
        if summarize.github_output_path.is_some() {
            self.summarize.github_output_path = summarize.github_output_path.clone();
        }
        if summarize.fail_on_severity != default_fail_on_severity() {
            self.summarize.fail_on_severity = summarize.fail_on_severity.clone();
        }
        if !summarize.commit_sha.is_empty() {
            self.summarize.commit_sha = summarize.commit_sha.clone();
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: VulnsiftConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the current directory config file path (./vulnsift.toml)
    pub fn get_current_config_path() -> PathBuf {
        PathBuf::from("./vulnsift.toml")
    }

    pub fn generate_default_config() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Apply CI environment variables. Empty values count as unset.
    pub fn apply_env_vars(&mut self, env_vars: &HashMap<String, String>) {
        for (key, value) in env_vars {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "GRYPE_REPORT_PATH" => self.summarize.report_path = PathBuf::from(value),
                "GRYPE_COMMENT_PATH" => self.summarize.comment_path = PathBuf::from(value),
                "GITHUB_STEP_SUMMARY" => self.summarize.step_summary_path = Some(PathBuf::from(value)),
                "GITHUB_OUTPUT" => self.summarize.github_output_path = Some(PathBuf::from(value)),
                "FAIL_ON_SEVERITY" => self.summarize.fail_on_severity = value.clone(),
                "GITHUB_SHA" => self.summarize.commit_sha = value.clone(),
                "VULNSIFT_FILTER_MIN_SEVERITY" => self.filter.min_severity = value.clone(),
                "VULNSIFT_FILTER_ALLOWLIST" => self.filter.allowlist = Some(PathBuf::from(value)),
                _ => {}
            }
        }
    }

    pub fn apply_filter_args(&mut self, args: &FilterArgs) {
        if let Some(ref min_severity) = args.min_severity {
            self.filter.min_severity = min_severity.clone();
        }
        if let Some(ref allowlist) = args.allowlist {
            self.filter.allowlist = Some(allowlist.clone());
        }
    }

    pub fn apply_summarize_args(&mut self, args: &SummarizeArgs) {
        if let Some(ref report) = args.report {
            self.summarize.report_path = report.clone();
        }
        if let Some(ref comment) = args.comment {
            self.summarize.comment_path = comment.clone();
        }
        if let Some(ref fail_on) = args.fail_on {
            self.summarize.fail_on_severity = fail_on.clone();
        }
    }

    /// Load configuration with precedence:
    /// 1. Default values (lowest)
    /// 2. Config file (explicit path, else ./vulnsift.toml when present)
    /// 3. Environment variables
    ///
    /// CLI arguments are applied on top by each command.
    pub fn load_with_precedence(
        config_path: Option<&Path>,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        match config_path {
            Some(path) => {
                let explicit = Self::load_from_file(path)
                    .map_err(|e| anyhow!("Failed to load config file {}: {}", path.display(), e))?;
                config.merge(&explicit);
            }
            None => {
                let current_path = Self::get_current_config_path();
                if current_path.exists() {
                    match Self::load_from_file(&current_path) {
                        Ok(current) => {
                            config.merge(&current);
                            log::debug!("Loaded config from: {}", current_path.display());
                        }
                        Err(e) => log::warn!("Ignoring {}: {}", current_path.display(), e),
                    }
                }
            }
        }

        config.apply_env_vars(env_vars);
        Ok(config)
    }

    /// Severity labels are never rejected: an unrecognised threshold ranks 0
    /// and keeps everything. Only the summarize output paths are checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("summarize.report_path", &self.summarize.report_path),
            ("summarize.comment_path", &self.summarize.comment_path),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn filter_args(min_severity: Option<&str>) -> FilterArgs {
        FilterArgs {
            input: PathBuf::from("in.json"),
            output: PathBuf::from("out.json"),
            min_severity: min_severity.map(str::to_string),
            allowlist: None,
            config: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = VulnsiftConfig::default();
        assert_eq!(config.filter.min_severity, "critical");
        assert!(config.filter.allowlist.is_none());
        assert_eq!(config.summarize.report_path, PathBuf::from("grype-report.json"));
        assert_eq!(config.summarize.comment_path, PathBuf::from("grype-comment.md"));
        assert_eq!(config.summarize.fail_on_severity, "high");
        assert!(config.summarize.step_summary_path.is_none());
        assert!(config.summarize.github_output_path.is_none());
    }

    #[test]
    fn test_toml_parsing() {
        let toml_content = r#"
[filter]
min_severity = "high"
allowlist = ".github/grype-allowlist.txt"

[summarize]
comment_path = "out/comment.md"
"#;

        let config: VulnsiftConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.filter.min_severity, "high");
        assert_eq!(config.filter.allowlist, Some(PathBuf::from(".github/grype-allowlist.txt")));
        assert_eq!(config.summarize.comment_path, PathBuf::from("out/comment.md"));
        assert_eq!(config.summarize.report_path, PathBuf::from("grype-report.json"));
    }

    #[test]
    fn test_env_var_application() {
        let mut config = VulnsiftConfig::default();
        let mut env_vars = HashMap::new();
        env_vars.insert("GRYPE_REPORT_PATH".to_string(), "scan/report.json".to_string());
        env_vars.insert("GITHUB_STEP_SUMMARY".to_string(), "/tmp/summary".to_string());
        env_vars.insert("GITHUB_OUTPUT".to_string(), "/tmp/output".to_string());
        env_vars.insert("FAIL_ON_SEVERITY".to_string(), "critical".to_string());
        env_vars.insert("GITHUB_SHA".to_string(), "0123456789abcdef".to_string());
        env_vars.insert("GRYPE_COMMENT_PATH".to_string(), String::new());
        env_vars.insert("UNRELATED".to_string(), "x".to_string());

        config.apply_env_vars(&env_vars);

        assert_eq!(config.summarize.report_path, PathBuf::from("scan/report.json"));
        assert_eq!(config.summarize.comment_path, PathBuf::from("grype-comment.md"));
        assert_eq!(config.summarize.step_summary_path, Some(PathBuf::from("/tmp/summary")));
        assert_eq!(config.summarize.github_output_path, Some(PathBuf::from("/tmp/output")));
        assert_eq!(config.summarize.fail_on_label(), "Critical");
        assert_eq!(config.summarize.short_commit(), "0123456");
    }

    #[test]
    fn test_short_commit_handles_short_values() {
        let config = SummarizeConfig {
            commit_sha: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(config.short_commit(), "abc");
        assert_eq!(SummarizeConfig::default().short_commit(), "");
    }

    #[test]
    fn test_config_file_loading() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[summarize]
fail_on_severity = "medium"
"#
        )
        .unwrap();

        let config = VulnsiftConfig::load_with_precedence(Some(temp_file.path()), &HashMap::new()).unwrap();
        assert_eq!(config.summarize.fail_on_severity, "medium");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = VulnsiftConfig::load_with_precedence(
            Some(Path::new("/nonexistent/vulnsift.toml")),
            &HashMap::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_precedence_env_then_cli() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[filter]\nmin_severity = \"low\"").unwrap();

        let mut env_vars = HashMap::new();
        env_vars.insert("VULNSIFT_FILTER_MIN_SEVERITY".to_string(), "medium".to_string());

        let mut config = VulnsiftConfig::load_with_precedence(Some(temp_file.path()), &env_vars).unwrap();
        assert_eq!(config.filter.min_severity, "medium");

        config.apply_filter_args(&filter_args(None));
        assert_eq!(config.filter.min_severity, "medium");

        config.apply_filter_args(&filter_args(Some("high")));
        assert_eq!(config.filter.min_severity, "high");
    }

    #[test]
    fn test_validation_accepts_any_severity_label() {
        let mut config = VulnsiftConfig::default();
        assert!(config.validate().is_ok());

        for label in ["", "not rated", "very high", "  "] {
            config.filter.min_severity = label.to_string();
            config.summarize.fail_on_severity = label.to_string();
            assert!(config.validate().is_ok(), "label {:?} was rejected", label);
        }
    }

    #[test]
    fn test_validation_rejects_empty_paths() {
        let mut config = VulnsiftConfig::default();
        config.summarize.comment_path = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPath { ref field }) if field == "summarize.comment_path"
        ));
    }

    #[test]
    fn test_severity_labels_from_toml_and_cli_are_kept() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[filter]\nmin_severity = \"not rated\"").unwrap();

        let config = VulnsiftConfig::load_with_precedence(Some(temp_file.path()), &HashMap::new()).unwrap();
        assert_eq!(config.filter.min_severity, "not rated");
        assert!(config.validate().is_ok());

        let mut config = VulnsiftConfig::default();
        config.apply_filter_args(&filter_args(Some("")));
        assert_eq!(config.filter.min_severity, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_default_config() {
        let generated = VulnsiftConfig::generate_default_config();
        let parsed: VulnsiftConfig = toml::from_str(&generated).unwrap();
        assert_eq!(parsed.filter.min_severity, "critical");
        assert_eq!(parsed.summarize.fail_on_severity, "high");
    }
}
