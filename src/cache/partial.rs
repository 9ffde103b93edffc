//! Partial download files and their cleanup

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Extension of in-progress downloads inside the store
pub const PARTIAL_EXT: &str = "partial";

/// Unique name for a partial download.
///
/// Derived from a nanosecond UTC timestamp plus a short random suffix so
/// concurrent downloads never pick the same file.
pub fn partial_name() -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S%.9f");
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", stamp, &id[..8], PARTIAL_EXT)
}

/// Removes a partial download if it still exists.
///
/// Runs when dropped, so every exit path (success, error, or a dropped future)
/// cleans up. Call [`Cleanup::run`] to do it eagerly.
#[derive(Debug, Default)]
#[must_use = "dropping the guard removes the partial file immediately"]
pub struct Cleanup {
    path: Option<PathBuf>,
}

impl Cleanup {
    /// Guard for a partial file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A guard with nothing to clean (cache hits)
    pub fn noop() -> Self {
        Self::default()
    }

    /// The guarded file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Remove the partial file now
    pub fn run(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => debug!("Removed partial download {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Unable to remove partial download {}: {}", path.display(), e),
        }
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        self.remove();
    }
}
