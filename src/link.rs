//! Versioned and unversioned command links
//!
//! `<namespace>/<command>-<version>` is created once and never touched
//! again. `<namespace>/<command>` follows the highest version ever linked and
//! is swapped atomically when a newer one arrives.

use crate::error::{BinrError, BinrResult};
use crate::layout::{link_target, validate_version, Layout};
use crate::version::{is_newest, Version};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Outcome of [`Linker::link`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linked {
    /// The versioned link that was created
    pub versioned: PathBuf,

    /// Whether the unversioned link now points at this version
    pub latest_updated: bool,
}

/// Creates links from the namespace tree into the store
#[derive(Debug, Clone)]
pub struct Linker {
    layout: Layout,
}

impl Linker {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Link `command` at `version` to the cache entry `digest`.
    ///
    /// Fails with [`BinrError::AlreadyLinked`] when the versioned link exists,
    /// and with [`BinrError::StateCorruption`] when the namespace holds a
    /// `<command>-*` entry whose suffix is not a version.
    pub fn link(
        &self,
        namespace: &str,
        command: &str,
        version: &str,
        digest: &str,
    ) -> BinrResult<Linked> {
        validate_version(version)?;
        let versioned = self.layout.path(namespace, command, version)?;
        let dir = self.layout.namespace_dir(namespace)?;

        std::fs::create_dir_all(&dir)
            .map_err(|e| BinrError::io(format!("creating namespace directory {}", dir.display()), e))?;

        // Scan before creating anything so a corrupt namespace is left as found
        let highest = self.highest_linked(namespace, command)?;

        let target = link_target(digest);
        debug!(
            target = %target.display(),
            path = %versioned.display(),
            "linking versioned"
        );
        symlink(&target, &versioned).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => BinrError::AlreadyLinked(versioned.clone()),
            _ => BinrError::io(format!("linking {}", versioned.display()), e),
        })?;

        let candidate = Version::parse(version)
            .map_err(|e| BinrError::InvalidArgument(format!("version {:?}: {}", version, e)))?;
        if !is_newest(&candidate, highest.as_ref()) {
            debug!("{} {} is not the newest, leaving unversioned link unchanged", command, version);
            return Ok(Linked {
                versioned,
                latest_updated: false,
            });
        }

        let unversioned = self.layout.path(namespace, command, "")?;
        debug!(
            target = %target.display(),
            path = %unversioned.display(),
            "updating unversioned link"
        );
        replace_symlink(&target, &unversioned, &dir, command)?;

        Ok(Linked {
            versioned,
            latest_updated: true,
        })
    }

    /// Highest version linked for `command` in `namespace`, if any.
    ///
    /// Every entry named `<command>-*` must end in a version, so a sibling
    /// command such as `<command>-x` makes this fail with `StateCorruption`.
    /// Listing splits names differently and shows such an entry as its own
    /// command.
    pub fn highest_linked(&self, namespace: &str, command: &str) -> BinrResult<Option<Version>> {
        let dir = self.layout.namespace_dir(namespace)?;
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BinrError::io(
                    format!("checking for latest version in {}", dir.display()),
                    e,
                ))
            }
        };

        let prefix = format!("{}-", command);
        let mut highest: Option<Version> = None;

        for entry in entries {
            let entry =
                entry.map_err(|e| BinrError::io(format!("reading {}", dir.display()), e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            // Other commands, and the unversioned link of this one
            let Some(suffix) = name.strip_prefix(&prefix) else {
                continue;
            };

            let version = Version::parse(suffix).map_err(|_| {
                BinrError::corrupt(
                    entry.path(),
                    format!(
                        "expected the form {}-<version> with a semver such as v1.2.3",
                        command
                    ),
                )
            })?;

            if highest.as_ref().map_or(true, |h| version > *h) {
                highest = Some(version);
            }
        }

        Ok(highest)
    }
}

/// Point `link` at `target`, replacing whatever is there in one rename
fn replace_symlink(target: &Path, link: &Path, dir: &Path, command: &str) -> BinrResult<()> {
    let id = Uuid::new_v4().simple().to_string();
    let staging = dir.join(format!(".{}.{}.tmp", command, &id[..8]));

    symlink(target, &staging)
        .map_err(|e| BinrError::io(format!("linking {}", staging.display()), e))?;

    std::fs::rename(&staging, link).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        BinrError::io(format!("replacing {}", link.display()), e)
    })
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
