//! List command - show installed commands and versions

use crate::checksum::short_digest;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Settings;
use crate::error::BinrResult;
use crate::inventory::{list_installed, InstalledCommand};
use crate::layout::Layout;
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, settings: &Settings) -> BinrResult<()> {
    let installed = list_installed(&Layout::new(settings), &args.namespace)?;

    if installed.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => println!("No commands installed in {}", args.namespace),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&installed),
        OutputFormat::Json => print_json(&installed)?,
        OutputFormat::Plain => print_plain(&installed),
    }

    Ok(())
}

fn print_table(commands: &[InstalledCommand]) {
    println!(
        "{:<24} {:<16} {:<8} {:<14}",
        style("COMMAND").bold(),
        style("VERSION").bold(),
        style("LATEST").bold(),
        style("DIGEST").bold()
    );
    println!("{}", "-".repeat(64));

    for command in commands {
        for installed in &command.versions {
            let is_latest = command.latest.as_deref() == Some(installed.version.as_str());
            let latest = if is_latest {
                style("*").green()
            } else {
                style("")
            };
            let digest = installed
                .digest
                .as_deref()
                .map(|d| short_digest(d, 12))
                .unwrap_or("?");

            println!(
                "{:<24} {:<16} {:<8} {:<14}",
                command.name, installed.version, latest, digest
            );
        }
    }

    println!();
    println!("{} command(s)", commands.len());
}

fn print_json(commands: &[InstalledCommand]) -> BinrResult<()> {
    let json = serde_json::to_string_pretty(commands)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(commands: &[InstalledCommand]) {
    for command in commands {
        for installed in &command.versions {
            println!("{}-{}", command.name, installed.version);
        }
    }
}
