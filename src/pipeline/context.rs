//! Scoped build context
//!
//! Templates and the build tool resolve paths against the process working
//! directory, so a build enters its staging directory and must leave it
//! again on every exit path. Only one build context may be active at a
//! time; builds run strictly sequentially.

use crate::error::{BuildError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Working-directory change that is undone on drop
#[derive(Debug)]
pub struct BuildContext {
    previous: PathBuf,
}

impl BuildContext {
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir().map_err(|e| BuildError::filesystem(".", e))?;
        env::set_current_dir(dir).map_err(|e| BuildError::filesystem(dir, e))?;
        debug!("Entered build context {}", dir.display());

        Ok(Self { previous })
    }

    /// Directory restored when the context is dropped
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for BuildContext {
    fn drop(&mut self) {
        match env::set_current_dir(&self.previous) {
            Ok(()) => debug!("Restored build context {}", self.previous.display()),
            Err(e) => error!(
                "Failed to restore build context {}: {}",
                self.previous.display(),
                e
            ),
        }
    }
}
