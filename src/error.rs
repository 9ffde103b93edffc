//! Error types for binr
//!
//! All modules use `BinrResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for binr operations
pub type BinrResult<T> = Result<T, BinrError>;

/// Error returned by a [`Resolver`](crate::resolver::Resolver)
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// All errors that can occur in binr
#[derive(Error, Debug)]
pub enum BinrError {
    // Caller errors
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is not yet implemented")]
    Unsupported(&'static str),

    #[error("{0}")]
    Resolve(ResolveError),

    // Upstream errors
    #[error("received HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} reported a content type of {actual:?} when {expected:?} was expected")]
    ContentType {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("checksum from {url} is not a sha256 hex digest: {body:?}")]
    MalformedChecksum { url: String, body: String },

    // Integrity errors
    #[error("checksum mismatch for {path}: expected {expected}, calculated {actual}")]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // Benign races
    #[error("download target already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("already linked: {0}")]
    AlreadyLinked(PathBuf),

    // On-disk state errors
    #[error("unexpected entry {path}: {reason}")]
    StateCorruption { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BinrError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a state corruption error for an on-disk entry
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StateCorruption {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the remote side (or the network) is at fault
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. }
                | Self::ContentType { .. }
                | Self::Transport { .. }
                | Self::MalformedChecksum { .. }
        )
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        self.is_upstream()
    }

    /// Races that mean "someone else already did it"
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyExists(_) | Self::AlreadyLinked(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Integrity { .. } => {
                Some("The download did not match its published checksum and was discarded")
            }
            Self::AlreadyExists(_) => {
                Some("If it is left over from an earlier failed attempt, remove it and retry")
            }
            Self::StateCorruption { .. } => {
                Some("Remove or rename the offending entry in the binr directory")
            }
            Self::HttpStatus { .. } | Self::Transport { .. } => Some("Check the source URL and retry"),
            _ => None,
        }
    }
}
