pub mod filter;
pub mod render;
pub mod summarize;

pub use filter::{filter_changes, run_filter_command};
pub use render::{render_changes, run_render_command};
pub use summarize::{run_summarize_command, summarize_report, SummarizeOutcome};
