//! Object-store uploads and smart-contract catalogue refresh.
//!
//! Both actions report into one status line, so a refresh started after an
//! upload supersedes the upload's status and vice versa.

use std::sync::Arc;

use shared::protocol::{RefreshResponse, UploadResponse};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{StudioError, REFRESH_TRANSPORT_MESSAGE, UPLOAD_TRANSPORT_MESSAGE},
    ingest::{FileReader, SelectedFile},
    latest::{Latest, Sequenced},
    ObjectUpload, StudioBackend,
};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload success!";
pub const NO_FILE_SELECTED_MESSAGE: &str = "No file selected!";
pub const REFRESH_SUCCESS_MESSAGE: &str = "Smart contracts refreshed successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    NoFileSelected,
    Failed { reason: String },
}

impl UploadOutcome {
    fn from_error(err: &StudioError) -> Self {
        UploadOutcome::Failed {
            reason: err.display_message(UPLOAD_TRANSPORT_MESSAGE),
        }
    }

    pub fn status_message(&self) -> &str {
        match self {
            UploadOutcome::Uploaded => UPLOAD_SUCCESS_MESSAGE,
            UploadOutcome::NoFileSelected => NO_FILE_SELECTED_MESSAGE,
            UploadOutcome::Failed { reason } => reason,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, UploadOutcome::Uploaded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed { reason: String },
}

impl RefreshOutcome {
    pub fn status_message(&self) -> &str {
        match self {
            RefreshOutcome::Refreshed => REFRESH_SUCCESS_MESSAGE,
            RefreshOutcome::Failed { reason } => reason,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RefreshOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageStatus {
    Upload(UploadOutcome),
    Refresh(RefreshOutcome),
}

impl StorageStatus {
    pub fn message(&self) -> &str {
        match self {
            StorageStatus::Upload(outcome) => outcome.status_message(),
            StorageStatus::Refresh(outcome) => outcome.status_message(),
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            StorageStatus::Upload(outcome) => outcome.is_error(),
            StorageStatus::Refresh(outcome) => outcome.is_error(),
        }
    }
}

/// `error` wins; an explicit `success: false` counts as a service-reported
/// failure carrying the accompanying message.
pub fn classify_upload(reply: UploadResponse) -> Result<(), StudioError> {
    if let Some(message) = reply.error {
        return Err(StudioError::ServiceReported(message));
    }
    if reply.success == Some(false) {
        let message = reply
            .message
            .unwrap_or_else(|| UPLOAD_TRANSPORT_MESSAGE.to_string());
        return Err(StudioError::ServiceReported(message));
    }
    Ok(())
}

pub fn classify_refresh(reply: RefreshResponse) -> Result<(), StudioError> {
    match reply.error {
        Some(message) => Err(StudioError::ServiceReported(message)),
        None => Ok(()),
    }
}

pub struct ObjectStorage {
    backend: Arc<dyn StudioBackend>,
    reader: Arc<dyn FileReader>,
    status: Latest<Option<StorageStatus>>,
}

impl ObjectStorage {
    pub fn new(backend: Arc<dyn StudioBackend>, reader: Arc<dyn FileReader>) -> Self {
        Self {
            backend,
            reader,
            status: Latest::new(None),
        }
    }

    /// With no file held this completes on its first poll: no read, no
    /// network call.
    pub async fn upload_file(&self, file: Option<&SelectedFile>) -> UploadOutcome {
        let Some(file) = file else {
            self.status.issue(|status| {
                *status = Some(StorageStatus::Upload(UploadOutcome::NoFileSelected))
            });
            return UploadOutcome::NoFileSelected;
        };

        let sequence = self.status.issue(|_| {});
        let outcome = match self.transfer(file, sequence).await {
            Ok(()) => UploadOutcome::Uploaded,
            Err(err) => UploadOutcome::from_error(&err),
        };
        info!(
            "storage: upload finished file={} sequence={sequence} error={}",
            file.file_name,
            outcome.is_error()
        );

        let shown = StorageStatus::Upload(outcome.clone());
        if !self.status.resolve(sequence, |status| *status = Some(shown)) {
            debug!("storage: superseded upload status discarded sequence={sequence}");
        }
        outcome
    }

    async fn transfer(&self, file: &SelectedFile, sequence: u64) -> Result<(), StudioError> {
        let bytes = self.reader.read(&file.path).await.map_err(|err| {
            warn!("storage: read failed file={} sequence={sequence}: {err:#}", file.file_name);
            StudioError::Read {
                file_name: file.file_name.clone(),
                reason: format!("{err:#}"),
            }
        })?;

        let upload = ObjectUpload {
            file_name: file.file_name.clone(),
            bytes,
        };
        let reply = self.backend.upload_object(upload).await.map_err(|err| {
            warn!("storage: transport failure file={} sequence={sequence}: {err:#}", file.file_name);
            StudioError::Transport
        })?;
        classify_upload(reply)
    }

    pub async fn refresh_smart_contracts(&self) -> RefreshOutcome {
        let sequence = self.status.issue(|_| {});
        let outcome = match self.backend.refresh_smart_contracts().await {
            Ok(reply) => classify_refresh(reply),
            Err(err) => {
                warn!("storage: refresh transport failure sequence={sequence}: {err:#}");
                Err(StudioError::Transport)
            }
        };
        let outcome = match outcome {
            Ok(()) => RefreshOutcome::Refreshed,
            Err(err) => RefreshOutcome::Failed {
                reason: err.display_message(REFRESH_TRANSPORT_MESSAGE),
            },
        };

        let shown = StorageStatus::Refresh(outcome.clone());
        if !self.status.resolve(sequence, |status| *status = Some(shown)) {
            debug!("storage: superseded refresh status discarded sequence={sequence}");
        }
        outcome
    }

    pub fn status(&self) -> Option<StorageStatus> {
        self.status.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Sequenced<Option<StorageStatus>>> {
        self.status.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/object_store_tests.rs"]
mod tests;
