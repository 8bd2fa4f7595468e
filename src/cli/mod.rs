pub mod args;
pub mod commands;
pub mod root;

pub use args::{
    validate_filter_args, validate_render_args, Args, Commands, FilterArgs, RenderArgs, SummarizeArgs,
};
pub use root::RootCommand;
