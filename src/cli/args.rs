use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Verbose diagnostics on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file (defaults to ./vulnsift.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter vulnerable changes by allowlist or minimum severity
    Filter {
        /// Path to the vulnerable-changes JSON
        #[arg(long)]
        input: PathBuf,

        /// Destination JSON with filtered results
        #[arg(long)]
        output: PathBuf,

        /// Minimum severity (critical/high/moderate/low) [default: critical]
        #[arg(long)]
        min_severity: Option<String>,

        /// Allowlist file; when it has entries, severity is ignored
        #[arg(long)]
        allowlist: Option<PathBuf>,
    },

    /// Summarize a Grype report into a step summary and a PR comment
    Summarize {
        /// Grype JSON report [env: GRYPE_REPORT_PATH] [default: grype-report.json]
        #[arg(long)]
        report: Option<PathBuf>,

        /// Comment output file [env: GRYPE_COMMENT_PATH] [default: grype-comment.md]
        #[arg(long)]
        comment: Option<PathBuf>,

        /// Failure threshold shown in the summary [env: FAIL_ON_SEVERITY] [default: high]
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// Render vulnerable changes as a Markdown table
    Render {
        /// Path to the vulnerable-changes JSON
        #[arg(long)]
        input: PathBuf,

        /// Destination Markdown file
        #[arg(long)]
        output: PathBuf,

        /// One row per entry instead of one row per package
        #[arg(long)]
        flat: bool,
    },

    /// Print a default vulnsift.toml
    Config,
}

#[derive(Debug, Clone)]
pub struct FilterArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub min_severity: Option<String>,
    pub allowlist: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SummarizeArgs {
    pub report: Option<PathBuf>,
    pub comment: Option<PathBuf>,
    pub fail_on: Option<String>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub flat: bool,
}

fn require_input(input: &Path, prefix: &str) {
    if !input.exists() {
        eprintln!("[{}] Input file not found: {}", prefix, input.display());
        std::process::exit(1);
    }
}

pub fn validate_filter_args(args: &FilterArgs) -> Result<()> {
    require_input(&args.input, "filter-allowlist");
    Ok(())
}

pub fn validate_render_args(args: &RenderArgs) -> Result<()> {
    require_input(&args.input, "render");
    Ok(())
}
