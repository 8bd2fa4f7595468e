//! Writing Markdown files, step summaries and pipeline outputs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write `content` to `path`, creating parent directories.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write lines joined by newlines, always ending with a newline.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    write_text(path, &(lines.join("\n") + "\n"))
}

/// Append lines to `path` (e.g. a CI step summary), ending with a newline.
pub fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    writeln!(file, "{}", lines.join("\n"))?;
    log::debug!("Appended {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// Append the `has_vulns` and `comment_path` outputs for downstream steps.
pub fn write_pipeline_outputs(output_file: &Path, has_vulns: bool, comment_path: &Path) -> Result<()> {
    let lines = vec![
        format!("has_vulns={}", has_vulns),
        format!("comment_path={}", comment_path.display()),
    ];
    append_lines(output_file, &lines)
}
