//! Semantic version parsing and ordering
//!
//! Versions are written `vX.Y.Z` (the leading `v` is optional) and ordered by
//! semver precedence. Build metadata does not take part in the ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed version as it appears in link names
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    semver: semver::Version,
}

impl Version {
    /// Parse a version string, accepting an optional `v`/`V` prefix
    pub fn parse(input: &str) -> Result<Self, semver::Error> {
        let trimmed = input
            .strip_prefix('v')
            .or_else(|| input.strip_prefix('V'))
            .unwrap_or(input);
        Ok(Self {
            raw: input.to_string(),
            semver: semver::Version::parse(trimmed)?,
        })
    }

    /// Whether the string is a valid version
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// The string this version was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn semver(&self) -> &semver::Version {
        &self.semver
    }

    fn precedence_key(&self) -> (u64, u64, u64, &semver::Prerelease) {
        (
            self.semver.major,
            self.semver.minor,
            self.semver.patch,
            &self.semver.pre,
        )
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Prerelease orders an empty pre-release above any non-empty one
        self.precedence_key().cmp(&other.precedence_key())
    }
}

impl FromStr for Version {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Whether `candidate` is at least as new as every version in `existing`.
///
/// An empty `existing` means `candidate` is the newest.
pub fn is_newest<'a>(candidate: &Version, existing: impl IntoIterator<Item = &'a Version>) -> bool {
    existing.into_iter().max().map_or(true, |highest| candidate >= highest)
}
