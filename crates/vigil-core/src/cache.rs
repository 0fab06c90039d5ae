//! Best-effort local persistence for the ping history.
//!
//! The whole history mapping lives in one JSON file, read once at startup
//! and overwritten wholesale after every update. An absent or corrupt
//! file yields an empty default; persistence failures are logged and
//! never surfaced to the user. No schema versioning.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, VigilError};
use crate::state::HistoryMap;

/// Reader/writer for the single history cache entry.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    path: PathBuf,
}

impl HistoryCache {
    /// Create a cache handle for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached history mapping.
    ///
    /// Returns the empty default when the file is absent or does not
    /// parse; a corrupt cache is never an error.
    pub fn load(&self) -> HistoryMap {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history cache, starting empty");
                return HistoryMap::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read history cache");
                return HistoryMap::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(history) => history,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt history cache, starting empty");
                HistoryMap::default()
            }
        }
    }

    /// Overwrite the cache with the full history mapping.
    ///
    /// Writes to a temp file first, then renames for atomicity.
    pub fn store(&self, history: &HistoryMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VigilError::DirectoryCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string(history)
            .map_err(|e| VigilError::cache(&self.path, format!("serialize failed: {e}")))?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &json)
            .map_err(|e| VigilError::cache(&temp_path, e.to_string()))?;

        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| VigilError::cache(&self.path, e.to_string()))?;

        debug!(path = %self.path.display(), entities = history.len(), "history cache written");
        Ok(())
    }
}
