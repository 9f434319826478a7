//! Locating the running process's own backing archive.
//!
//! Discovering the process image is inherently platform-specific, so it sits
//! behind a small trait; the launch core stays testable against synthetic
//! archives by injecting a [`FixedLocator`].

use std::path::PathBuf;

use crate::error::LaunchError;

/// Resolves the path of the archive that provides the running code.
pub trait SelfLocate: Send + Sync {
    fn locate(&self) -> Result<PathBuf, LaunchError>;
}

/// Locates the current process image via the platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentExeLocator;

impl SelfLocate for CurrentExeLocator {
    fn locate(&self) -> Result<PathBuf, LaunchError> {
        std::env::current_exe().map_err(|e| LaunchError::SelfLocation {
            detail: e.to_string(),
        })
    }
}

/// A locator with a known path, for explicit archive arguments and tests.
#[derive(Debug, Clone)]
pub struct FixedLocator(pub PathBuf);

impl SelfLocate for FixedLocator {
    fn locate(&self) -> Result<PathBuf, LaunchError> {
        Ok(self.0.clone())
    }
}
