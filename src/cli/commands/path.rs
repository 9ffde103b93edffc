//! Path command - print where a command is exposed

use crate::cli::args::PathArgs;
use crate::config::Settings;
use crate::error::BinrResult;
use crate::layout::Layout;

/// Execute the path command
pub async fn execute(args: PathArgs, settings: &Settings) -> BinrResult<()> {
    let version = args.release.as_deref().unwrap_or_default();
    let path = Layout::new(settings).path(&args.namespace, &args.command, version)?;
    println!("{}", path.display());
    Ok(())
}
