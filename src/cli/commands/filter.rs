use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use vulnsift_core::load_changes;
use vulnsift_filter::{Allowlist, FilterOutcome};
use vulnsift_reports::write_text;

use crate::cli::args::FilterArgs;
use crate::config::{FilterConfig, VulnsiftConfig};

pub fn run_filter_command(args: FilterArgs) -> Result<()> {
    let env_vars: HashMap<String, String> = std::env::vars().collect();
    let mut config = VulnsiftConfig::load_with_precedence(args.config.as_deref(), &env_vars)?;
    config.apply_filter_args(&args);
    config.validate()?;

    log::debug!(
        "Filtering {} with min_severity={} allowlist={:?}",
        args.input.display(),
        config.filter.min_severity,
        config.filter.allowlist
    );

    let outcome = filter_changes(&args.input, &args.output, &config.filter)?;
    println!("{}", outcome.console_line());
    Ok(())
}

/// Filter `input` into `output` and return what was written.
pub fn filter_changes(input: &Path, output: &Path, config: &FilterConfig) -> Result<FilterOutcome> {
    let document = load_changes(input)?;
    let allowlist = Allowlist::load(config.allowlist.as_deref())?;

    let outcome = FilterOutcome::build(&document.vulnerable_changes, &allowlist, &config.min_severity);

    let json = serde_json::to_string_pretty(&outcome).context("Failed to serialize filter result")?;
    write_text(output, &json)?;
    log::info!(
        "Wrote {} of {} entries to {}",
        outcome.summary.filtered,
        outcome.summary.total,
        output.display()
    );

    Ok(outcome)
}
