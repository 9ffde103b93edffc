//! Download, verify and commit binaries into the store

use crate::cache::partial::{partial_name, Cleanup};
use crate::checksum;
use crate::download::{Downloader, BINARY_CONTENT_TYPE};
use crate::error::{BinrError, BinrResult};
use crate::layout::Layout;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Outcome of [`CacheStore::ensure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    /// Digest naming the cache entry
    pub digest: String,

    /// Whether the entry was already present (no download happened)
    pub cached: bool,
}

/// Content-addressed store rooted at `<base>/binr/.cache`
pub struct CacheStore {
    dir: PathBuf,
    downloader: Downloader,
}

impl CacheStore {
    pub fn new(layout: &Layout, downloader: Downloader) -> Self {
        Self {
            dir: layout.cache_dir(),
            downloader,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if missing
    pub async fn setup(&self) -> BinrResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            BinrError::io(format!("creating cache directory {}", self.dir.display()), e)
        })
    }

    /// Path of the entry for `digest`
    pub fn entry(&self, digest: &str) -> PathBuf {
        self.dir.join(digest)
    }

    /// Whether an entry for `digest` exists
    pub async fn contains(&self, digest: &str) -> bool {
        !digest.is_empty() && fs::metadata(self.entry(digest)).await.is_ok()
    }

    /// Make sure the content at `url` is in the store.
    ///
    /// With an `expected` digest that is already stored this returns at once
    /// without touching the network. Otherwise the content is downloaded to a
    /// partial file, verified against `expected` (or hashed when there is
    /// none), and renamed to its digest.
    ///
    /// The returned [`Cleanup`] must be kept until the caller is done; on the
    /// error paths it has already run.
    pub async fn ensure(&self, url: &str, expected: Option<&str>) -> BinrResult<(Stored, Cleanup)> {
        debug!(url, checksum = expected.unwrap_or_default(), "sourcing command");

        if let Some(digest) = expected {
            if self.contains(digest).await {
                debug!("Cache hit for {}", digest);
                let stored = Stored {
                    digest: digest.to_string(),
                    cached: true,
                };
                return Ok((stored, Cleanup::noop()));
            }
        }

        let partial = self.dir.join(partial_name());
        let cleanup = Cleanup::new(&partial);

        self.downloader
            .fetch(url, &partial, BINARY_CONTENT_TYPE)
            .await?;

        let digest = match expected {
            Some(digest) => {
                checksum::verify(&partial, digest).await?;
                digest.to_ascii_lowercase()
            }
            None => checksum::digest(&partial).await?,
        };

        let entry = self.entry(&digest);
        debug!("Moving {} into place at {}", partial.display(), entry.display());
        fs::rename(&partial, &entry).await.map_err(|e| {
            BinrError::io(
                format!("moving {} to {}", partial.display(), entry.display()),
                e,
            )
        })?;

        let stored = Stored {
            digest,
            cached: false,
        };
        Ok((stored, cleanup))
    }
}
