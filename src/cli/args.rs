//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// binr - binaries on demand
///
/// Downloads command-line tools into a content-addressed cache and exposes
/// them under stable, namespaced paths.
#[derive(Parser, Debug)]
#[command(name = "binr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Base directory (defaults to $XDG_CONFIG_HOME or ~/.config)
    #[arg(long, global = true, env = "BINR_BASE_DIR")]
    pub base_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the path at which a command is exposed
    Path(PathArgs),

    /// Download a command if needed and print its path
    Get(GetArgs),

    /// List commands installed in a namespace
    List(ListArgs),
}

/// Arguments for the path command
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Namespace (usually the name of the application using binr)
    pub namespace: String,

    /// Command name
    pub command: String,

    /// Version (omit for the link to the newest installed version)
    #[arg(value_name = "VERSION")]
    pub release: Option<String>,
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Namespace (usually the name of the application using binr)
    pub namespace: String,

    /// Command name
    pub command: String,

    /// Exact version, e.g. v1.2.3
    #[arg(value_name = "VERSION")]
    pub release: String,

    /// Source URL template; {version}, {os}, {arch} and {command} are substituted
    #[arg(long)]
    pub url: String,

    /// Checksum URL template (plaintext sha256), same placeholders as --url
    #[arg(long)]
    pub checksum_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Replace an installed binary (not implemented yet)
    #[arg(long)]
    pub update: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Namespace to list
    pub namespace: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
