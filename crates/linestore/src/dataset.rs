//! Dataset directory
//!
//! Layout: every dataset `<id>` lives at `<dir>/<id>.<extension>`, one
//! record per line. Files are append-only and treated as immutable once
//! served.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::BufReader;

use crate::error::{Error, Result};
use crate::locator::{locate, LineLocator};

/// Default dataset file extension
pub const DEFAULT_EXTENSION: &str = "txt";

/// Read buffer used while scanning for a line (64 KiB)
pub const SCAN_BUFFER_SIZE: usize = 64 * 1024;

/// A directory of line-oriented datasets
#[derive(Debug, Clone)]
pub struct Dataset {
    dir: PathBuf,
    extension: String,
}

impl Dataset {
    /// Datasets under `dir` with the default `txt` extension
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map an identifier to its file path
    ///
    /// Identifiers are a single path component: separators, NUL, `.` and
    /// `..` are rejected so a request can never leave the data directory.
    pub fn resolve(&self, id: &str) -> Result<PathBuf> {
        let invalid = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(&['/', '\\', '\0'][..]);
        if invalid {
            return Err(Error::InvalidIdentifier(id.to_string()));
        }

        Ok(self.dir.join(format!("{}.{}", id, self.extension)))
    }

    /// Whether the dataset file is present
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let path = self.resolve(id)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    /// Open the dataset for reading
    pub async fn open(&self, id: &str) -> Result<File> {
        let path = self.resolve(id)?;
        Ok(File::open(&path).await?)
    }
}

#[async_trait]
impl LineLocator for Dataset {
    async fn locate(&self, file_id: &str, line_number: u64) -> Result<String> {
        let file = self.open(file_id).await?;
        locate(BufReader::with_capacity(SCAN_BUFFER_SIZE, file), line_number).await
    }
}
