//! orgcost - Organization cost tracker
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use orgcost::cli::{Cli, Commands, CostsArgs};
use orgcost::core::logging::{self, LogSettings};
use orgcost::storage::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_settings = LogSettings::resolve(cli.log_level.as_deref(), cli.json_output, cli.verbose);
    logging::init(&log_settings);

    let config = match ResolvedConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            let no_color = !orgcost::util::env::should_use_color(cli.no_color);
            return fail(&e, cli.effective_format(), no_color, cli.pretty);
        }
    };

    let no_color = !orgcost::util::env::should_use_color(config.no_color);
    colored::control::set_override(!no_color);

    tracing::debug!(
        base_url = %config.base_url,
        base_url_source = %config.sources.base_url,
        api_key_source = %config.sources.api_key,
        "Resolved configuration"
    );

    match run(cli.command, &config, no_color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e, config.format, no_color, config.pretty),
    }
}

async fn run(command: Option<Commands>, config: &ResolvedConfig, no_color: bool) -> orgcost::Result<()> {
    match command {
        // Default to the costs report
        None => orgcost::cli::costs::execute(&CostsArgs::default(), config, no_color).await,
        Some(Commands::Costs(args)) => orgcost::cli::costs::execute(&args, config, no_color).await,
        Some(Commands::Validate(args)) => {
            orgcost::cli::validate::execute(&args, config, no_color).await
        }
        Some(Commands::Pricing) => orgcost::cli::pricing::execute(config, no_color),
    }
}

fn fail(
    error: &orgcost::OrgcostError,
    format: orgcost::cli::OutputFormat,
    no_color: bool,
    pretty: bool,
) -> ExitCode {
    tracing::error!(error = %error, code = error.error_code(), "Command failed");
    let output = orgcost::render::error::render_error(error, format, no_color, pretty);
    eprintln!("{output}");
    ExitCode::from(error.exit_code() as u8)
}
