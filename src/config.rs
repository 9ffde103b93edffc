//! Configuration for binr
//!
//! Everything binr needs from the outside world is carried in [`Settings`].
//! The environment is read once, by [`Settings::from_env`], at the process
//! boundary; the rest of the crate never looks at it.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Directory under the base directory that holds all binr state
pub const BINR_DIR: &str = "binr";

/// Variable naming the home directory. Only the variable counts: an unset or
/// empty value means there is no home, without falling back to the user
/// database.
#[cfg(windows)]
const HOME_VAR: &str = "USERPROFILE";
#[cfg(not(windows))]
const HOME_VAR: &str = "HOME";

/// Explicit configuration record
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base configuration directory (`$XDG_CONFIG_HOME`, `~/.config`, or cwd)
    pub base_dir: PathBuf,

    /// Timeout applied to each HTTP request. `None` leaves it to the caller.
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Settings rooted at an explicit base directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            timeout: None,
        }
    }

    /// Settings derived from `XDG_CONFIG_HOME`, the home directory, and the
    /// current directory
    pub fn from_env() -> Self {
        let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
        let home = std::env::var_os(HOME_VAR).map(PathBuf::from);
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(resolve_base_dir(xdg, home, &cwd))
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Root of the binr tree (`<base>/binr`)
    pub fn root(&self) -> PathBuf {
        self.base_dir.join(BINR_DIR)
    }
}

/// Pick the base configuration directory.
///
/// `xdg` wins when set, then `<home>/.config`. With neither, `cwd` is used and
/// a warning is logged. Empty values count as unset, and relative values are
/// made absolute against `cwd`.
pub fn resolve_base_dir(xdg: Option<PathBuf>, home: Option<PathBuf>, cwd: &Path) -> PathBuf {
    let xdg = xdg.filter(|p| !p.as_os_str().is_empty());
    let home = home.filter(|p| !p.as_os_str().is_empty());

    let base = match (xdg, home) {
        (Some(xdg), _) => xdg,
        (None, Some(home)) => home.join(".config"),
        (None, None) => {
            warn!(
                "No home directory nor XDG_CONFIG_HOME found, using the current directory: {}",
                cwd.display()
            );
            return cwd.to_path_buf();
        }
    };

    if base.is_absolute() {
        base
    } else {
        cwd.join(base)
    }
}
