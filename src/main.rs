//! binr - binaries on demand
//!
//! CLI entry point that dispatches to subcommands.

use binr::cli::{Cli, Commands};
use binr::config::{resolve_base_dir, Settings};
use binr::error::{BinrError, BinrResult};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BinrResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("binr=warn"),
        1 => EnvFilter::new("binr=info"),
        _ => EnvFilter::new("binr=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let settings = match cli.base_dir {
        Some(dir) => {
            let cwd = std::env::current_dir()
                .map_err(|e| BinrError::io("getting current directory", e))?;
            Settings::new(resolve_base_dir(Some(dir), None, &cwd))
        }
        None => Settings::from_env(),
    };

    match cli.command {
        Commands::Path(args) => binr::cli::commands::path(args, &settings).await,
        Commands::Get(args) => binr::cli::commands::get(args, &settings).await,
        Commands::List(args) => binr::cli::commands::list(args, &settings).await,
    }
}
