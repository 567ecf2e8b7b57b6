//! Reads user-selected files into memory.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    error::StudioError,
    latest::{Latest, Sequenced},
};

/// A file the user picked. Only the handle is held; bytes are read on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { file_name, path }
    }
}

#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

pub struct TokioFileReader;

#[async_trait]
impl FileReader for TokioFileReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))
    }
}

/// Holds the text of the most recently requested file.
///
/// A newer [`FileIngestor::ingest`] call supersedes older ones by issue order:
/// an older read that finishes late is returned to its caller but never
/// replaces the held text.
pub struct FileIngestor {
    reader: Arc<dyn FileReader>,
    held: Latest<Option<String>>,
}

impl FileIngestor {
    pub fn new() -> Self {
        Self::with_reader(Arc::new(TokioFileReader))
    }

    pub fn with_reader(reader: Arc<dyn FileReader>) -> Self {
        Self {
            reader,
            held: Latest::new(None),
        }
    }

    pub async fn ingest(&self, file: &SelectedFile) -> Result<String, StudioError> {
        let sequence = self.held.issue(|_| {});
        let text = match self.reader.read(&file.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!("ingest: read failed file={} sequence={sequence}: {err:#}", file.file_name);
                return Err(StudioError::Read {
                    file_name: file.file_name.clone(),
                    reason: format!("{err:#}"),
                });
            }
        };

        let landed = self
            .held
            .resolve(sequence, |held| *held = Some(text.clone()));
        if !landed {
            debug!(
                "ingest: superseded read discarded file={} sequence={sequence}",
                file.file_name
            );
        }
        Ok(text)
    }

    /// Drops the held text and invalidates any read still in flight.
    pub fn clear(&self) {
        self.held.issue(|held| *held = None);
    }

    pub fn held_text(&self) -> Option<String> {
        self.held.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Sequenced<Option<String>>> {
        self.held.subscribe()
    }
}

impl Default for FileIngestor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/ingest_tests.rs"]
mod tests;
