//! On-disk layout of the binr tree
//!
//! ```text
//! <base>/binr/.cache/<sha256>                  content-addressed store
//! <base>/binr/<namespace>/<command>            unversioned ("latest") link
//! <base>/binr/<namespace>/<command>-<version>  versioned link
//! ```

use crate::config::Settings;
use crate::error::{BinrError, BinrResult};
use crate::version::Version;
use std::path::{Path, PathBuf};

/// Name of the content store directory under the binr root
pub const CACHE_DIR: &str = ".cache";

/// Deterministic paths for namespaces, commands and cache entries
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Layout rooted at `<base>/binr`
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.root(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The content-addressed store
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR)
    }

    /// Path of the cache entry for a digest
    pub fn cache_entry(&self, digest: &str) -> PathBuf {
        self.cache_dir().join(digest)
    }

    /// Directory holding a namespace's links
    pub fn namespace_dir(&self, namespace: &str) -> BinrResult<PathBuf> {
        validate_name("namespace", namespace)?;
        Ok(self.root.join(namespace))
    }

    /// Path at which a command is exposed.
    ///
    /// An empty `version` yields the unversioned link. The path is not
    /// checked for existence.
    pub fn path(&self, namespace: &str, command: &str, version: &str) -> BinrResult<PathBuf> {
        let dir = self.namespace_dir(namespace)?;
        validate_name("command", command)?;
        if version.is_empty() {
            return Ok(dir.join(command));
        }
        validate_version(version)?;
        Ok(dir.join(versioned_name(command, version)))
    }
}

/// File name of a versioned link
pub fn versioned_name(command: &str, version: &str) -> String {
    format!("{}-{}", command, version)
}

/// Relative target of a link inside a namespace directory
pub fn link_target(digest: &str) -> PathBuf {
    Path::new("..").join(CACHE_DIR).join(digest)
}

/// Reject names that are empty or would escape or collide within the tree
pub fn validate_name(kind: &str, name: &str) -> BinrResult<()> {
    if name.is_empty() {
        return Err(BinrError::InvalidArgument(format!("{} is required", kind)));
    }
    if name.starts_with('.') || name.contains('/') || name.contains('\\') {
        return Err(BinrError::InvalidArgument(format!(
            "{} {:?} must not start with '.' or contain path separators",
            kind, name
        )));
    }
    Ok(())
}

/// Reject anything that is not a semver
pub fn validate_version(version: &str) -> BinrResult<()> {
    Version::parse(version).map(|_| ()).map_err(|e| {
        BinrError::InvalidArgument(format!(
            "version {:?} must be a valid semver such as v1.2.3 ({})",
            version, e
        ))
    })
}
