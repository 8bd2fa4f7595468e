use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::args::{
    validate_filter_args, validate_render_args, Args, Commands, FilterArgs, RenderArgs, SummarizeArgs,
};
use crate::cli::commands::{run_filter_command, run_render_command, run_summarize_command};
use crate::config::VulnsiftConfig;

pub struct RootCommand;

impl RootCommand {
    pub fn execute() -> Result<()> {
        let args = Args::parse();
        init_logging(args.verbosity, args.debug);

        match args.command {
            Commands::Filter {
                input,
                output,
                min_severity,
                allowlist,
            } => {
                let filter_args = FilterArgs {
                    input,
                    output,
                    min_severity,
                    allowlist,
                    config: args.config,
                };

                validate_filter_args(&filter_args)?;
                run_filter_command(filter_args)
            }
            Commands::Summarize {
                report,
                comment,
                fail_on,
            } => {
                let summarize_args = SummarizeArgs {
                    report,
                    comment,
                    fail_on,
                    config: args.config,
                };

                run_summarize_command(summarize_args)
            }
            Commands::Render {
                input,
                output,
                flat,
            } => {
                let render_args = RenderArgs {
                    input,
                    output,
                    flat,
                };

                validate_render_args(&render_args)?;
                run_render_command(render_args)
            }
            Commands::Config => {
                println!("{}", VulnsiftConfig::generate_default_config());
                Ok(())
            }
        }
    }
}

/// Warnings by default; `-v` for info, `-vv` or `--debug` for debug.
/// `RUST_LOG` still takes precedence.
fn init_logging(verbosity: u8, debug: bool) {
    let level = match (debug, verbosity) {
        (true, _) | (_, 2..) => LevelFilter::Debug,
        (_, 1) => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .ok();
}
