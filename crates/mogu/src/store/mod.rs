//! Storage layer for mogu.
//!
//! The whole restaurant list lives in one JSON file. Every load reads the
//! file from scratch and every save overwrites it in full; there is no cache,
//! no index, and no cross-process locking.

pub mod schema;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::restaurant::{Collection, Restaurant};

/// File-backed store for the restaurant list.
#[derive(Debug, Clone)]
pub struct Store {
    /// Path to the record file.
    path: PathBuf,
    /// Write the versioned envelope instead of a bare array.
    versioned: bool,
}

impl Store {
    /// Create a store backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first load or save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            versioned: false,
        }
    }

    /// Choose whether saves write the versioned envelope.
    #[must_use]
    pub fn versioned(mut self, versioned: bool) -> Self {
        self.versioned = versioned;
        self
    }

    /// Get the path to the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection.
    ///
    /// A missing file is created holding an empty collection. A file that
    /// cannot be read or parsed yields an empty collection; the problem is
    /// logged but not returned, so callers cannot tell it apart from a
    /// genuinely empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the missing file or its directory cannot be
    /// created, or if the file was written in a newer layout. The latter is
    /// kept intact rather than overwritten by the next save.
    pub fn load(&self) -> Result<Collection> {
        self.ensure_file()?;

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Could not read {}, treating list as empty: {}",
                    self.path.display(),
                    e
                );
                return Ok(Vec::new());
            }
        };

        match schema::decode(&raw) {
            Ok(list) => {
                debug!("Loaded {} restaurants from {}", list.len(), self.path.display());
                Ok(list)
            }
            Err(e @ Error::UnsupportedVersion { .. }) => Err(e),
            Err(e) => {
                warn!(
                    "Malformed restaurant file {}, treating list as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the file with the given collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, list: &[Restaurant]) -> Result<()> {
        self.ensure_file()?;
        self.write(list)?;
        debug!("Saved {} restaurants to {}", list.len(), self.path.display());
        Ok(())
    }

    /// Create the parent directory and an empty record file if missing.
    fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        if !self.path.exists() {
            self.write(&[])?;
            info!("Created empty restaurant list at {}", self.path.display());
        }
        Ok(())
    }

    fn write(&self, list: &[Restaurant]) -> Result<()> {
        let contents = schema::encode(list, self.versioned)?;
        std::fs::write(&self.path, contents).map_err(|source| Error::StoreWrite {
            path: self.path.clone(),
            source,
        })
    }
}
