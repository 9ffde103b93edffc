//! Get command - download a command if needed and print its path

use crate::cli::args::GetArgs;
use crate::config::Settings;
use crate::error::BinrResult;
use crate::installer::{Binr, GetOptions};
use crate::resolver::TemplateResolver;
use std::time::Duration;
use tracing::debug;

/// Execute the get command
pub async fn execute(args: GetArgs, settings: &Settings) -> BinrResult<()> {
    let mut settings = settings.clone();
    if let Some(secs) = args.timeout {
        settings = settings.with_timeout(Duration::from_secs(secs));
    }

    let mut resolver = TemplateResolver::new(&args.command, &args.url);
    if let Some(template) = &args.checksum_url {
        resolver = resolver.with_checksum_url(template);
    }

    let options = GetOptions {
        update: args.update,
    };

    debug!("Using base directory {}", settings.base_dir.display());
    let path = Binr::new(settings)
        .get_with(&args.namespace, &args.command, &args.release, &resolver, options)
        .await?;

    println!("{}", path.display());
    Ok(())
}
