//! Getting commands: check, resolve, download, cache, link

use crate::cache::CacheStore;
use crate::checksum::short_digest;
use crate::config::Settings;
use crate::download::Downloader;
use crate::error::{BinrError, BinrResult};
use crate::inventory::{list_installed, InstalledCommand};
use crate::layout::{validate_name, validate_version, Layout};
use crate::link::Linker;
use crate::resolver::{Platform, Resolver};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;
use tracing::{debug, info};

/// Per-call options for [`Binr::get_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    /// Replace binaries that are already installed. Not implemented yet;
    /// asking for it is an error.
    pub update: bool,
}

impl GetOptions {
    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }
}

type CommandKey = (String, String);

/// Binary manager bound to one base directory
pub struct Binr {
    settings: Settings,
    layout: Layout,
    downloader: Downloader,
    store: CacheStore,
    linker: Linker,
    // One writer at a time per (namespace, command) within this process
    locks: Mutex<HashMap<CommandKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl Binr {
    pub fn new(settings: Settings) -> Self {
        let layout = Layout::new(&settings);
        let downloader = Downloader::new(&settings);
        Self {
            store: CacheStore::new(&layout, downloader.clone()),
            linker: Linker::new(layout.clone()),
            downloader,
            layout,
            settings,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Manager configured from the process environment
    pub fn from_env() -> Self {
        Self::new(Settings::from_env())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Absolute path at which a command is (or would be) exposed.
    ///
    /// An empty `version` gives the unversioned link that always points at
    /// the newest installed version.
    pub fn path(&self, namespace: &str, command: &str, version: &str) -> BinrResult<PathBuf> {
        self.layout.path(namespace, command, version)
    }

    /// Get the path to `command` at `version`, downloading it if needed
    pub async fn get(
        &self,
        namespace: &str,
        command: &str,
        version: &str,
        resolver: &dyn Resolver,
    ) -> BinrResult<PathBuf> {
        self.get_with(namespace, command, version, resolver, GetOptions::default())
            .await
    }

    /// [`Binr::get`] with explicit options
    pub async fn get_with(
        &self,
        namespace: &str,
        command: &str,
        version: &str,
        resolver: &dyn Resolver,
        options: GetOptions,
    ) -> BinrResult<PathBuf> {
        debug!(
            namespace,
            command,
            version,
            update = options.update,
            "ensuring command"
        );

        validate_name("namespace", namespace)?;
        validate_name("command", command)?;
        if version.is_empty() {
            return Err(BinrError::InvalidArgument("version is required".to_string()));
        }
        validate_version(version)?;
        if options.update {
            return Err(BinrError::Unsupported("updating installed commands"));
        }

        self.store.setup().await?;
        let path = self.layout.path(namespace, command, version)?;

        let lock = self.lock_for(namespace, command);
        let _guard = lock.lock().await;

        if installed(&path).await? {
            debug!("Found {} locally at {}", command, path.display());
            return Ok(path);
        }

        let platform = Platform::current();
        let source = resolver
            .resolve(version, platform.os, platform.arch)
            .map_err(BinrError::Resolve)?;

        let expected = self.downloader.fetch_checksum(&source.checksum_url).await?;
        let (stored, cleanup) = self.store.ensure(&source.url, expected.as_deref()).await?;

        match self.linker.link(namespace, command, version, &stored.digest) {
            Ok(linked) => info!(
                "Installed {}/{} {} ({}{})",
                namespace,
                command,
                version,
                short_digest(&stored.digest, 12),
                if linked.latest_updated { ", latest" } else { "" }
            ),
            Err(e) if e.is_benign() => debug!("{}", e),
            Err(e) => return Err(e),
        }

        cleanup.run();
        debug!("Completed without error");
        Ok(path)
    }

    /// Commands installed in `namespace`
    pub fn list(&self, namespace: &str) -> BinrResult<Vec<InstalledCommand>> {
        list_installed(&self.layout, namespace)
    }

    fn lock_for(&self, namespace: &str, command: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry((namespace.to_string(), command.to_string()))
            .or_default()
            .clone()
    }
}

/// Whether `path` already exposes a usable binary.
///
/// A missing entry is not installed. An entry that exists but does not
/// resolve to a regular file is reported instead of being served.
async fn installed(path: &Path) -> BinrResult<bool> {
    match fs::symlink_metadata(path).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(BinrError::io(format!("checking {}", path.display()), e)),
    }

    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(true),
        Ok(_) => Err(BinrError::corrupt(path, "does not resolve to a file")),
        Err(_) => Err(BinrError::corrupt(path, "is a broken link")),
    }
}
