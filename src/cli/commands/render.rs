use anyhow::Result;
use std::path::Path;

use vulnsift_core::load_changes;
use vulnsift_reports::{to_flat_markdown, to_markdown, write_lines};

use crate::cli::args::RenderArgs;

pub fn run_render_command(args: RenderArgs) -> Result<()> {
    render_changes(&args.input, &args.output, args.flat)?;
    println!("{}", args.output.display());
    Ok(())
}

/// Render the changes in `input` as a Markdown table written to `output`.
pub fn render_changes(input: &Path, output: &Path, flat: bool) -> Result<Vec<String>> {
    let document = load_changes(input)?;
    let entries = &document.vulnerable_changes;

    let lines = if flat {
        log::debug!("Rendering {} entries as flat table", entries.len());
        to_flat_markdown(entries)
    } else {
        to_markdown(entries)
    };

    write_lines(output, &lines)?;
    Ok(lines)
}
