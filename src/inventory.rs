//! Listing what is installed in a namespace

use crate::error::{BinrError, BinrResult};
use crate::layout::Layout;
use crate::version::Version;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// One linked version of a command
#[derive(Debug, Clone, Serialize)]
pub struct InstalledVersion {
    pub version: String,

    /// Cache entry the link points at
    pub digest: Option<String>,

    pub path: PathBuf,
}

/// A command and every version linked for it
#[derive(Debug, Clone, Serialize)]
pub struct InstalledCommand {
    pub name: String,

    /// Version the unversioned link currently resolves to
    pub latest: Option<String>,

    /// Linked versions in ascending order
    pub versions: Vec<InstalledVersion>,
}

#[derive(Default)]
struct Collected {
    versions: Vec<(Version, InstalledVersion)>,
    latest_digest: Option<String>,
}

/// List the commands linked in `namespace`, sorted by name
pub fn list_installed(layout: &Layout, namespace: &str) -> BinrResult<Vec<InstalledCommand>> {
    let dir = layout.namespace_dir(namespace)?;
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BinrError::io(format!("reading {}", dir.display()), e)),
    };

    let mut commands: BTreeMap<String, Collected> = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|e| BinrError::io(format!("reading {}", dir.display()), e))?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let digest = link_digest(&path);

        match split_versioned(&name) {
            Some((command, version)) => {
                let installed = InstalledVersion {
                    version: version.to_string(),
                    digest,
                    path,
                };
                commands
                    .entry(command.to_string())
                    .or_default()
                    .versions
                    .push((version, installed));
            }
            None => commands.entry(name).or_default().latest_digest = digest,
        }
    }

    Ok(commands
        .into_iter()
        .map(|(name, mut collected)| {
            collected.versions.sort_by(|a, b| a.0.cmp(&b.0));
            let latest = collected.latest_digest.as_ref().and_then(|digest| {
                collected
                    .versions
                    .iter()
                    .rev()
                    .find(|(_, v)| v.digest.as_ref() == Some(digest))
                    .map(|(version, _)| version.to_string())
            });
            InstalledCommand {
                name,
                latest,
                versions: collected.versions.into_iter().map(|(_, v)| v).collect(),
            }
        })
        .collect())
}

/// Split `<command>-<version>` at the left-most `-` followed by a version.
///
/// Looser than [`Linker::highest_linked`](crate::link::Linker::highest_linked),
/// which treats every `<command>-*` entry as a version of `<command>`: here
/// `tool-x-v1.0.0` lists as command `tool-x`, while linking `tool` in the
/// same namespace fails with `StateCorruption`.
fn split_versioned(name: &str) -> Option<(&str, Version)> {
    name.match_indices('-')
        .map(|(i, _)| i)
        .filter(|&i| i > 0)
        .find_map(|i| Version::parse(&name[i + 1..]).ok().map(|v| (&name[..i], v)))
}

fn link_digest(path: &Path) -> Option<String> {
    std::fs::read_link(path)
        .ok()?
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}
