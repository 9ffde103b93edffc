//! binr - binaries on demand
//!
//! Downloads command-line executables when they are first asked for, keeps
//! them in a content-addressed store, and exposes them under stable
//! namespaced paths:
//!
//! ```text
//! ~/.config/binr/<namespace>/<command>-<version>   a specific release
//! ~/.config/binr/<namespace>/<command>             the newest release installed
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use binr::{Binr, ResolveError, Settings, Source};
//!
//! # async fn run() -> binr::BinrResult<()> {
//! let binr = Binr::new(Settings::from_env());
//! let resolver = |version: &str, os: &str, arch: &str| -> Result<Source, ResolveError> {
//!     Ok(Source::new(format!("https://example.com/{version}/{os}/{arch}/tool"))
//!         .with_checksum(format!("https://example.com/{version}/{os}/{arch}/tool.sha256")))
//! };
//! let path = binr.get("myapp", "tool", "v1.2.3", &resolver).await?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod installer;
pub mod inventory;
pub mod layout;
pub mod link;
pub mod resolver;
pub mod version;

pub use config::Settings;
pub use error::{BinrError, BinrResult, ResolveError};
pub use installer::{Binr, GetOptions};
pub use resolver::{Platform, Resolver, Source, TemplateResolver};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

/// Get `command` at `version` for `namespace`, rooted per the environment.
///
/// Calls for the same base directory share one [`Binr`], so concurrent calls
/// in this process are serialized per command. See [`Binr::get`].
pub async fn get(
    namespace: &str,
    command: &str,
    version: &str,
    resolver: &dyn Resolver,
) -> BinrResult<PathBuf> {
    shared(Settings::from_env())
        .get(namespace, command, version, resolver)
        .await
}

/// Path at which `command` is exposed, rooted per the environment.
///
/// See [`Binr::path`].
pub fn path(namespace: &str, command: &str, version: &str) -> BinrResult<PathBuf> {
    layout::Layout::new(&Settings::from_env()).path(namespace, command, version)
}

/// Process-wide manager for a base directory
fn shared(settings: Settings) -> Arc<Binr> {
    static MANAGERS: OnceLock<Mutex<HashMap<PathBuf, Arc<Binr>>>> = OnceLock::new();

    let mut managers = MANAGERS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    managers
        .entry(settings.base_dir.clone())
        .or_insert_with(|| Arc::new(Binr::new(settings)))
        .clone()
}
