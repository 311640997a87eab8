//! Persistence
//!
//! Local state persistence as keyed JSON blobs, one file per store. The
//! in-memory stores remain the source of truth; blobs are read once when a
//! session opens and rewritten after every mutating operation.

use std::{fs, io, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod records;

/// Errors related to reading or writing state blobs.
#[derive(Debug, Error)]
pub enum VaultError {
    /// IO error reading or writing a state blob.
    #[error("failed to access state blob: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding error.
    #[error("failed to encode or decode state blob: {0}")]
    Json(#[from] serde_json::Error),
}

/// Vault
///
/// A directory of keyed JSON blobs (`<key>.json`).
#[derive(Debug, Clone)]
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    /// Create a vault rooted at the given directory. The directory is created
    /// lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load the blob stored under `key`, or `None` when no blob exists yet.
    ///
    /// # Errors
    ///
    /// Returns a `VaultError` if the blob exists but cannot be read or
    /// decoded.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, VaultError> {
        let contents = match fs::read_to_string(self.blob_path(key)) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write the blob stored under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns a `VaultError` if the directory cannot be created or the blob
    /// cannot be encoded or written.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), VaultError> {
        fs::create_dir_all(&self.dir)?;

        let contents = serde_json::to_string(value)?;

        fs::write(self.blob_path(key), contents)?;

        Ok(())
    }
}
