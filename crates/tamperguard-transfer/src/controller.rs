//! Transfer controller
//!
//! Orchestrates the session: file selection, upload and verdict
//! classification, download of the processed artifact. Every user-facing
//! failure is passed to the [`Notifier`] before it is returned, and every
//! upload leaves `Submitting` exactly once, even when the future is dropped
//! mid-request.

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tamperguard_api_client::{ApiError, TamperService};
use tamperguard_core::constants::{
    DEFAULT_DOWNLOAD_ERROR_MESSAGE, DEFAULT_TRANSFER_ERROR_MESSAGE,
};
use tamperguard_core::{
    validate_candidate, ClientConfig, FileCandidate, LogLevel, SelectedFile, ServiceResponse,
    TamperingReport, TransferStatus, WorkflowError,
};
use tokio::sync::watch;

use crate::notify::{Notice, Notifier};
use crate::saver::{BlobSaver, SavedArtifact};
use crate::state::{StateStore, WorkflowState};

/// Classified result of a successful upload, with the message already
/// resolved to the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Unchanged {
        message: String,
    },
    Modified {
        message: String,
        report: TamperingReport,
    },
    Uploaded {
        message: String,
        key: Option<String>,
    },
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Unchanged { message }
            | Outcome::Modified { message, .. }
            | Outcome::Uploaded { message, .. } => message,
        }
    }

    pub fn report(&self) -> Option<&TamperingReport> {
        match self {
            Outcome::Modified { report, .. } => Some(report),
            _ => None,
        }
    }
}

impl From<ServiceResponse> for Outcome {
    fn from(response: ServiceResponse) -> Self {
        let message = response.message_or_default();
        match response {
            ServiceResponse::Unchanged { .. } => Outcome::Unchanged { message },
            ServiceResponse::Modified { report, .. } => Outcome::Modified { message, report },
            ServiceResponse::Uploaded { key, .. } => Outcome::Uploaded { message, key },
        }
    }
}

pub struct TransferController {
    service: Arc<dyn TamperService>,
    saver: Arc<dyn BlobSaver>,
    notifier: Arc<dyn Notifier>,
    state: StateStore,
    upload_timeout: Duration,
    download_timeout: Duration,
}

impl TransferController {
    pub fn new(
        service: Arc<dyn TamperService>,
        saver: Arc<dyn BlobSaver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let defaults = ClientConfig::default();
        Self {
            service,
            saver,
            notifier,
            state: StateStore::new(),
            upload_timeout: defaults.upload_timeout(),
            download_timeout: defaults.download_timeout(),
        }
    }

    pub fn with_timeouts(mut self, upload: Duration, download: Duration) -> Self {
        self.upload_timeout = upload;
        self.download_timeout = download;
        self
    }

    /// Current state snapshot.
    pub fn state(&self) -> WorkflowState {
        self.state.snapshot()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Validate and accept a picked file.
    ///
    /// On success the previous selection and any tampering report are
    /// replaced. On failure the state is left untouched.
    pub fn select_file(&self, candidate: FileCandidate) -> Result<SelectedFile, WorkflowError> {
        let file = validate_candidate(candidate).map_err(|e| self.reject(e.into()))?;
        self.state
            .select(file.clone())
            .map_err(|e| self.reject(e))?;

        tracing::info!(
            file_name = %file.name(),
            size_bytes = file.size(),
            "File selected"
        );
        Ok(file)
    }

    /// Upload the selected file and apply the service's verdict.
    pub async fn upload(&self) -> Result<Outcome, WorkflowError> {
        let file = self.state.begin_upload().map_err(|e| self.reject(e))?;
        let guard = SubmissionGuard::new(&self.state);

        tracing::info!(file_name = %file.name(), "Upload started");

        match self.submit(&file).await {
            Ok(response) => {
                let outcome = Outcome::from(response);
                guard.settle(
                    TransferStatus::Succeeded,
                    outcome.report().cloned(),
                    outcome.message(),
                );
                tracing::info!(
                    file_name = %file.name(),
                    outcome = ?outcome,
                    "Upload completed"
                );
                self.notifier.notify(&Notice::info(outcome.message()));
                Ok(outcome)
            }
            Err(err) => {
                guard.settle(TransferStatus::Failed, None, &err.user_message());
                Err(self.reject(err))
            }
        }
    }

    async fn submit(&self, file: &SelectedFile) -> Result<ServiceResponse, WorkflowError> {
        let reply = bounded("upload", self.upload_timeout, self.service.upload_video(file))
            .await?
            .map_err(|e| transfer_error(&e, DEFAULT_TRANSFER_ERROR_MESSAGE))?;
        reply.classify()
    }

    /// Retrieve the processed artifact for the selected file.
    pub async fn download(&self) -> Result<SavedArtifact, WorkflowError> {
        let file = self.state.begin_download().map_err(|e| self.reject(e))?;
        let object_name = file.encrypted_name();

        let result = {
            let _guard = DownloadGuard(&self.state);
            self.fetch(&object_name).await
        };

        match result {
            Ok(saved) => {
                tracing::info!(
                    object_name = %object_name,
                    path = ?saved.path,
                    "Download completed"
                );
                let text = match &saved.path {
                    Some(path) => format!("Saved {} to {}", saved.name, path.display()),
                    None => format!("Saved {}", saved.name),
                };
                self.notifier.notify(&Notice::info(text));
                Ok(saved)
            }
            Err(err) => {
                tracing::debug!(object_name = %object_name, "Download failed");
                Err(self.reject(err))
            }
        }
    }

    async fn fetch(&self, object_name: &str) -> Result<SavedArtifact, WorkflowError> {
        let reply = bounded(
            "download",
            self.download_timeout,
            self.service.lookup_download(object_name),
        )
        .await?
        .map_err(|e| transfer_error(&e, DEFAULT_DOWNLOAD_ERROR_MESSAGE))?;

        let locator = reply.locator().ok_or(WorkflowError::NoDownloadUrl)?;

        bounded(
            "download",
            self.download_timeout,
            self.saver.save_blob(object_name, locator),
        )
        .await?
        .map_err(|e| WorkflowError::Save(e.to_string()))
    }

    fn reject(&self, err: WorkflowError) -> WorkflowError {
        match err.log_level() {
            LogLevel::Debug => tracing::debug!(error = %err, "Action rejected"),
            LogLevel::Warn => tracing::warn!(error = %err, "Action failed"),
            LogLevel::Error => tracing::error!(error = %err, "Action failed"),
        }
        self.notifier.notify(&Notice::error(err.user_message()));
        err
    }
}

async fn bounded<F: Future>(
    operation: &'static str,
    after: Duration,
    fut: F,
) -> Result<F::Output, WorkflowError> {
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| WorkflowError::Timeout { operation, after })
}

fn transfer_error(err: &ApiError, fallback: &str) -> WorkflowError {
    let message = err.user_message();
    if message.trim().is_empty() {
        WorkflowError::Transfer(fallback.to_string())
    } else {
        WorkflowError::Transfer(message)
    }
}

/// Moves the status out of `Submitting` when the upload settles, or to
/// `Failed` if the upload future is dropped first.
struct SubmissionGuard<'a> {
    state: &'a StateStore,
    settled: bool,
}

impl<'a> SubmissionGuard<'a> {
    fn new(state: &'a StateStore) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, status: TransferStatus, report: Option<TamperingReport>, message: &str) {
        self.state
            .finish_upload(status, report, Some(message.to_string()));
        self.settled = true;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Upload abandoned before the service replied");
            self.state.finish_upload(
                TransferStatus::Failed,
                None,
                Some("Upload cancelled".to_string()),
            );
        }
    }
}

/// Clears the in-flight download flag however the download ends.
struct DownloadGuard<'a>(&'a StateStore);

impl Drop for DownloadGuard<'_> {
    fn drop(&mut self) {
        self.0.finish_download();
    }
}
