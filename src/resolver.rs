//! Source resolution
//!
//! A [`Resolver`] maps a version and platform to the URLs of a binary and,
//! optionally, its checksum. Closures of the right shape are resolvers.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};

/// Where a binary (and its checksum) can be downloaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// URL of the binary itself
    pub url: String,

    /// URL of a plaintext sha256 digest. Empty when none is published.
    #[serde(default)]
    pub checksum_url: String,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            checksum_url: String::new(),
        }
    }

    pub fn with_checksum(mut self, checksum_url: impl Into<String>) -> Self {
        self.checksum_url = checksum_url.into();
        self
    }
}

/// Operating system and architecture binaries are requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    /// The platform this process runs on
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

/// Maps `(version, os, arch)` to download locations
pub trait Resolver: Send + Sync {
    fn resolve(&self, version: &str, os: &str, arch: &str) -> Result<Source, ResolveError>;
}

impl<F> Resolver for F
where
    F: Fn(&str, &str, &str) -> Result<Source, ResolveError> + Send + Sync,
{
    fn resolve(&self, version: &str, os: &str, arch: &str) -> Result<Source, ResolveError> {
        self(version, os, arch)
    }
}

/// Resolver built from URL templates.
///
/// `{version}`, `{os}`, `{arch}` and `{command}` are substituted.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    command: String,
    url: String,
    checksum_url: Option<String>,
}

impl TemplateResolver {
    pub fn new(command: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            url: url.into(),
            checksum_url: None,
        }
    }

    pub fn with_checksum_url(mut self, template: impl Into<String>) -> Self {
        self.checksum_url = Some(template.into());
        self
    }

    fn render(&self, template: &str, version: &str, os: &str, arch: &str) -> String {
        template
            .replace("{command}", &self.command)
            .replace("{version}", version)
            .replace("{os}", os)
            .replace("{arch}", arch)
    }
}

impl Resolver for TemplateResolver {
    fn resolve(&self, version: &str, os: &str, arch: &str) -> Result<Source, ResolveError> {
        if self.url.is_empty() {
            return Err("no source URL template given".into());
        }
        let checksum_url = self
            .checksum_url
            .as_deref()
            .map(|t| self.render(t, version, os, arch))
            .unwrap_or_default();
        Ok(Source {
            url: self.render(&self.url, version, os, arch),
            checksum_url,
        })
    }
}
