//! Persistence of the most recent [`ParseResult`] so a dashboard survives restarts.
//!
//! The result is stored as JSON (`{"type", "data", "columns"}`) in a single file named after
//! [`STORE_KEY`] inside the store directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::IngestionResult;
use crate::types::ParseResult;

/// Well-known key under which the last parsed upload is kept.
pub const STORE_KEY: &str = "medal_google_ads_data";

/// File-backed store holding at most one [`ParseResult`].
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Create a store rooted at `dir`. The directory is created lazily on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Location of the stored JSON document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORE_KEY}.json"))
    }

    /// Persist `result`, replacing any previously stored one.
    pub fn save(&self, result: &ParseResult) -> IngestionResult<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(result)?;

        // Readers never observe a partially written document.
        let tmp = self.dir.join(format!("{STORE_KEY}.json.tmp"));
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, self.path()) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path().display(), kind = %result.kind(), records = result.data.len(), "saved parse result");
        Ok(())
    }

    /// Like [`Self::save`], but failures (quota, permissions) are logged and ignored.
    ///
    /// Returns `true` when the result was written.
    pub fn save_best_effort(&self, result: &ParseResult) -> bool {
        match self.save(result) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(path = %self.path().display(), %error, "could not persist parse result");
                false
            }
        }
    }

    /// Load the stored result.
    ///
    /// Returns `None` when nothing is stored or the stored document cannot be read back.
    pub fn load(&self) -> Option<ParseResult> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "could not read stored parse result");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(result) => Some(result),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring invalid stored parse result");
                None
            }
        }
    }

    /// Remove the stored result. Clearing an empty store is not an error.
    pub fn clear(&self) -> IngestionResult<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
