//! Locating the `cjpeg` encoder binary.
//!
//! Resolution order:
//! 1. `JPEGFIT_CJPEG`, an explicit path
//! 2. the provisioned cache `<cache>/<version>/<platform>/cjpeg`, trusted only
//!    when the `.ready` sentinel written after provisioning is present
//! 3. `cjpeg` on `PATH`

use std::path::{Path, PathBuf};

use super::cancel::CancelToken;
use crate::error::SetupError;

pub const CJPEG_ENV: &str = "JPEGFIT_CJPEG";
pub const CACHE_DIR_ENV: &str = "JPEGFIT_CACHE_DIR";

/// Cache subdirectory for the provisioned encoder build.
pub const TOOLCHAIN_VERSION: &str = "mozjpeg-4.1.4";

const READY_SENTINEL: &str = ".ready";
const CJPEG: &str = "cjpeg";

/// `<os>-<arch>`, e.g. `linux-x86_64`.
pub fn platform_key() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// A resolved encoder toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub cjpeg: PathBuf,
}

impl Toolchain {
    /// Resolve the toolchain from the environment. Called once per batch.
    pub fn ensure(cancel: &CancelToken) -> Result<Self, SetupError> {
        Self::ensure_with(&ToolchainLocator::from_env(), cancel)
    }

    pub fn ensure_with(locator: &ToolchainLocator, cancel: &CancelToken) -> Result<Self, SetupError> {
        if cancel.is_cancelled() {
            return Err(SetupError::Cancelled);
        }
        let cjpeg = locator.locate()?;
        tracing::info!(cjpeg = %cjpeg.display(), "Resolved encoder toolchain");
        Ok(Self { cjpeg })
    }
}

/// Where to look for `cjpeg`.
#[derive(Debug, Clone, Default)]
pub struct ToolchainLocator {
    pub explicit: Option<PathBuf>,
    pub cache_root: Option<PathBuf>,
    pub search_path: bool,
}

impl ToolchainLocator {
    pub fn from_env() -> Self {
        let explicit = std::env::var_os(CJPEG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let cache_root = std::env::var_os(CACHE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("jpegfit")));
        Self {
            explicit,
            cache_root,
            search_path: true,
        }
    }

    /// Directory holding the provisioned binaries for this platform.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_root
            .as_ref()
            .map(|root| root.join(TOOLCHAIN_VERSION).join(platform_key()))
    }

    pub fn locate(&self) -> Result<PathBuf, SetupError> {
        if let Some(path) = &self.explicit {
            if path.is_file() {
                return Ok(path.clone());
            }
            return Err(SetupError::ToolchainUnavailable(format!(
                "{} points to {}, which is not a file",
                CJPEG_ENV,
                path.display()
            )));
        }

        if let Some(dir) = self.cache_dir() {
            if let Some(cjpeg) = provisioned(&dir) {
                return Ok(cjpeg);
            }
            tracing::debug!(dir = %dir.display(), "No provisioned encoder in cache");
        }

        if self.search_path {
            if let Ok(path) = which::which(CJPEG) {
                return Ok(path);
            }
        }

        Err(SetupError::ToolchainUnavailable(format!(
            "set {} or install {} on PATH",
            CJPEG_ENV, CJPEG
        )))
    }
}

fn provisioned(dir: &Path) -> Option<PathBuf> {
    let cjpeg = dir.join(CJPEG);
    (dir.join(READY_SENTINEL).is_file() && cjpeg.is_file()).then_some(cjpeg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn isolated() -> ToolchainLocator {
        ToolchainLocator {
            explicit: None,
            cache_root: None,
            search_path: false,
        }
    }

    #[test]
    fn test_platform_key_format() {
        let key = platform_key();
        assert_eq!(
            key,
            format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
        );
        assert!(key.contains('-'));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("my-cjpeg");
        fs::write(&bin, b"").unwrap();
        let locator = ToolchainLocator {
            explicit: Some(bin.clone()),
            ..isolated()
        };
        assert_eq!(locator.locate().unwrap(), bin);
    }

    #[test]
    fn test_explicit_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ToolchainLocator {
            explicit: Some(dir.path().join("nope")),
            ..isolated()
        };
        let err = locator.locate().unwrap_err();
        assert!(err.to_string().contains(CJPEG_ENV));
    }

    #[test]
    fn test_cache_requires_ready_sentinel() {
        let root = tempfile::tempdir().unwrap();
        let locator = ToolchainLocator {
            cache_root: Some(root.path().to_path_buf()),
            ..isolated()
        };
        let dir = locator.cache_dir().unwrap();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cjpeg"), b"").unwrap();

        assert!(matches!(
            locator.locate(),
            Err(SetupError::ToolchainUnavailable(_))
        ));

        fs::write(dir.join(".ready"), b"ok").unwrap();
        assert_eq!(locator.locate().unwrap(), dir.join("cjpeg"));
    }

    #[test]
    fn test_ensure_checks_cancellation_first() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            Toolchain::ensure_with(&isolated(), &cancel),
            Err(SetupError::Cancelled)
        ));
    }

    #[test]
    fn test_nothing_found() {
        let err = Toolchain::ensure_with(&isolated(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, SetupError::ToolchainUnavailable(_)));
    }
}
