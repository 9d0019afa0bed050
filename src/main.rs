//! msq - ModelScope Quota
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use msq::cli::{Cli, Commands};
use msq::core::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let (format, no_color, pretty) = (cli.effective_format(), cli.no_color, cli.pretty);

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!(
            "{}",
            msq::render::error::render_error_full(&e, format, no_color, pretty)
        );
        return ExitCode::from(e.exit_code() as u8);
    }
    ExitCode::SUCCESS
}

fn init_logging(cli: &Cli) {
    let level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::parse_log_level_from_env)
        .unwrap_or_default();
    let format = if cli.json_output {
        logging::LogFormat::Json
    } else {
        logging::parse_log_format_from_env().unwrap_or_default()
    };
    logging::init(level, format, logging::parse_log_file_from_env(), cli.verbose);
}

async fn run(cli: Cli) -> msq::Result<()> {
    match &cli.command {
        None => {
            print_quickstart();
            Ok(())
        }
        Some(Commands::Probe(args)) => msq::cli::probe::execute(&cli, args).await,
        Some(Commands::Serve(args)) => msq::cli::serve::execute(&cli, args).await,
    }
}

fn print_quickstart() {
    println!(
        r"msq - ModelScope Quota

Query per-model rate limits on the ModelScope inference API.

USAGE:
    msq [OPTIONS] <COMMAND>

COMMANDS:
    probe    Probe rate limits for one or more models
    serve    Run the HTTP query service

QUICK START:
    msq probe -m qwen-max                      # Probe a single model
    msq probe -m qwen-max,deepseek-v3 --json   # Probe several, JSON output
    msq serve -p 8000                          # Web UI at http://127.0.0.1:8000

Set MSQ_API_KEY (or pass --api-key) to authenticate probes.
Run 'msq --help' for all options."
    );
}
