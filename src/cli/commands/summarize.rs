use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

use vulnsift_core::load_matches;
use vulnsift_reports::{
    append_lines, format_comment, format_summary, select_top_packages, summarize_packages,
    write_pipeline_outputs, write_text,
};

use crate::cli::args::SummarizeArgs;
use crate::config::{SummarizeConfig, VulnsiftConfig};

/// What a summarize run produced.
#[derive(Debug, Clone)]
pub struct SummarizeOutcome {
    pub has_vulns: bool,
    pub comment_path: PathBuf,
    pub summary_lines: Vec<String>,
    pub comment: String,
}

pub fn run_summarize_command(args: SummarizeArgs) -> Result<()> {
    let env_vars: HashMap<String, String> = std::env::vars().collect();
    let mut config = VulnsiftConfig::load_with_precedence(args.config.as_deref(), &env_vars)?;
    config.apply_summarize_args(&args);
    config.validate()?;

    let outcome = summarize_report(&config.summarize)?;
    log::info!(
        "Summary written, has_vulns={}, comment={}",
        outcome.has_vulns,
        outcome.comment_path.display()
    );
    Ok(())
}

/// Summarize the configured report and write every configured output.
pub fn summarize_report(config: &SummarizeConfig) -> Result<SummarizeOutcome> {
    let matches = load_matches(&config.report_path)?;
    let digest = summarize_packages(&matches);
    let top = select_top_packages(&digest.packages);
    let has_vulns = !matches.is_empty();

    let summary_lines = format_summary(&digest, &config.fail_on_label(), &config.short_commit());
    let comment = format_comment(&summary_lines, &top, has_vulns);

    write_text(&config.comment_path, &comment)?;
    log::debug!("Comment written to {}", config.comment_path.display());

    if let Some(step_summary) = &config.step_summary_path {
        append_lines(step_summary, &summary_lines)?;
        log::debug!("Step summary appended to {}", step_summary.display());
    }
    if let Some(output_file) = &config.github_output_path {
        write_pipeline_outputs(output_file, has_vulns, &config.comment_path)?;
    }

    Ok(SummarizeOutcome {
        has_vulns,
        comment_path: config.comment_path.clone(),
        summary_lines,
        comment,
    })
}
