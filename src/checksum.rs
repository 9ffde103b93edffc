//! SHA-256 digests for downloaded files

use crate::error::{BinrError, BinrResult};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Length of a hex encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Stream a file through SHA-256 and return the lowercase hex digest
pub async fn digest(path: &Path) -> BinrResult<String> {
    let context = || format!("calculating checksum of {}", path.display());

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| BinrError::io(context(), e))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| BinrError::io(context(), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Fail with [`BinrError::Integrity`] unless the file hashes to `expected`
pub async fn verify(path: &Path, expected: &str) -> BinrResult<()> {
    let actual = digest(path).await?;
    if !actual.eq_ignore_ascii_case(expected) {
        debug!(
            path = %path.display(),
            expected,
            calculated = %actual,
            "checksum mismatch"
        );
        return Err(BinrError::Integrity {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Whether a string is a hex encoded SHA-256 digest
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Leading `len` characters of a digest for display.
///
/// Link targets are read back from disk and need not be hex, so this never
/// splits a character.
pub fn short_digest(digest: &str, len: usize) -> &str {
    digest
        .char_indices()
        .nth(len)
        .map_or(digest, |(end, _)| &digest[..end])
}

/// Extract the digest from a checksum response body.
///
/// Accepts a bare digest or a `sha256sum` line (`<digest>  <file>`).
pub fn parse_checksum(url: &str, body: &str) -> BinrResult<String> {
    let token = body.split_whitespace().next().unwrap_or_default();
    if !is_digest(token) {
        return Err(BinrError::MalformedChecksum {
            url: url.to_string(),
            body: body.trim().to_string(),
        });
    }
    Ok(token.to_ascii_lowercase())
}
