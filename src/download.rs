//! HTTP downloads
//!
//! Requests go through a blocking `ureq` agent on tokio's blocking pool.
//! Dropping a [`Downloader::fetch`] future raises an abort flag, and the copy
//! loop stops at the next chunk.

use crate::checksum::parse_checksum;
use crate::config::Settings;
use crate::error::{BinrError, BinrResult};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use ureq::Agent;

/// Content type every binary endpoint must answer with
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

const COPY_BUF_SIZE: usize = 64 * 1024;

/// HTTP client for binaries and their checksums
#[derive(Clone)]
pub struct Downloader {
    agent: Agent,
}

impl Downloader {
    /// Create a downloader honoring the configured timeout
    pub fn new(settings: &Settings) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(settings.timeout)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// Stream `url` into a new executable file at `dest`.
    ///
    /// Fails if `dest` already exists, if the response is not a 200, or if its
    /// content type is not exactly `content_type`. A partially written file
    /// may be left behind on failure; removing it is up to the caller. If the
    /// returned future is dropped, the transfer stops and removes whatever it
    /// wrote.
    pub async fn fetch(&self, url: &str, dest: &Path, content_type: &str) -> BinrResult<()> {
        if dest.symlink_metadata().is_ok() {
            return Err(BinrError::AlreadyExists(dest.to_path_buf()));
        }

        let abort = AbortOnDrop::default();
        let flag = Arc::clone(&abort.0);
        let agent = self.agent.clone();
        let url = url.to_string();
        let dest = dest.to_path_buf();
        let content_type = content_type.to_string();

        let result = tokio::task::spawn_blocking(move || {
            fetch_blocking(&agent, &url, &dest, &content_type, &flag)
        })
        .await
        .map_err(|e| BinrError::Internal(format!("download task failed: {}", e)))?;

        drop(abort);
        result
    }

    /// Fetch the expected digest published at `url`.
    ///
    /// An empty `url` means no checksum is published and yields `None`.
    pub async fn fetch_checksum(&self, url: &str) -> BinrResult<Option<String>> {
        if url.is_empty() {
            return Ok(None);
        }

        let agent = self.agent.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || fetch_checksum_blocking(&agent, &url).map(Some))
            .await
            .map_err(|e| BinrError::Internal(format!("checksum task failed: {}", e)))?
    }
}

/// Sets the shared flag when the owning future goes away
#[derive(Default)]
struct AbortOnDrop(Arc<AtomicBool>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn get(agent: &Agent, url: &str) -> BinrResult<ureq::http::Response<ureq::Body>> {
    let response = agent.get(url).call().map_err(|e| BinrError::Transport {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(BinrError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}

fn fetch_blocking(
    agent: &Agent,
    url: &str,
    dest: &Path,
    content_type: &str,
    abort: &AtomicBool,
) -> BinrResult<()> {
    let mut response = get(agent, url)?;

    let actual = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if actual != content_type {
        return Err(BinrError::ContentType {
            url: url.to_string(),
            expected: content_type.to_string(),
            actual,
        });
    }

    if abort.load(Ordering::Relaxed) {
        return Err(cancelled(url));
    }

    let mut file = create_executable(dest)?;
    let mut reader = response.body_mut().as_reader();
    let copied = copy_until_aborted(&mut reader, &mut file, abort);
    drop(file);

    // The caller may have run its cleanup before the file existed
    if abort.load(Ordering::Relaxed) {
        let _ = std::fs::remove_file(dest);
        return Err(cancelled(url));
    }

    let written =
        copied.map_err(|e| BinrError::io(format!("copying {} to {}", url, dest.display()), e))?;

    debug!("Downloaded {} bytes to {}", written, dest.display());
    Ok(())
}

fn cancelled(url: &str) -> BinrError {
    BinrError::io(
        format!("downloading {}", url),
        io::Error::new(io::ErrorKind::Interrupted, "download cancelled"),
    )
}

fn fetch_checksum_blocking(agent: &Agent, url: &str) -> BinrResult<String> {
    let mut response = get(agent, url)?;
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| BinrError::Transport {
            url: url.to_string(),
            source: e,
        })?;
    parse_checksum(url, &body)
}

/// Create `dest` exclusively with executable permission bits
fn create_executable(dest: &Path) -> BinrResult<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o755);
    }

    options.open(dest).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => BinrError::AlreadyExists(PathBuf::from(dest)),
        _ => BinrError::io(format!("opening {} for writing", dest.display()), e),
    })
}

fn copy_until_aborted(reader: &mut impl Read, file: &mut File, abort: &AtomicBool) -> io::Result<u64> {
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut written = 0u64;
    loop {
        if abort.load(Ordering::Relaxed) {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "download cancelled"));
        }
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        file.write_all(&buf[..n])?;
        written += n as u64;
    }
    file.flush()?;
    file.sync_all()?;
    Ok(written)
}
