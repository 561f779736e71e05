//! Workflow state
//!
//! One `WorkflowState` per session, published through a `tokio::sync::watch`
//! channel. Readers take snapshots or subscribe; only the controller writes.
//! The begin/finish transitions are single `send_if_modified` calls so a
//! guard check and the state change it protects cannot interleave.

use tamperguard_core::{SelectedFile, TamperingReport, TransferStatus, WorkflowError};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub selected: Option<SelectedFile>,
    pub status: TransferStatus,
    pub report: Option<TamperingReport>,
    /// Last message surfaced for an upload outcome.
    pub last_message: Option<String>,
    pub downloading: bool,
}

pub struct StateStore {
    tx: watch::Sender<WorkflowState>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WorkflowState::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.tx.subscribe()
    }

    /// Replace the selection and drop any previous report.
    pub(crate) fn select(&self, file: SelectedFile) -> Result<(), WorkflowError> {
        let mut rejected = None;
        self.tx.send_if_modified(|state| {
            if !state.status.controls_enabled() {
                rejected = Some(WorkflowError::Busy("upload"));
                return false;
            }
            state.selected = Some(file);
            state.report = None;
            true
        });
        rejected.map_or(Ok(()), Err)
    }

    /// Enter `Submitting` and hand back the file to send.
    pub(crate) fn begin_upload(&self) -> Result<SelectedFile, WorkflowError> {
        let mut claimed = Err(WorkflowError::NoFileSelected("upload"));
        self.tx.send_if_modified(|state| {
            let Some(file) = state.selected.as_ref() else {
                return false;
            };
            if state.status.is_submitting() {
                claimed = Err(WorkflowError::Busy("upload"));
                return false;
            }
            claimed = Ok(file.clone());
            state.status = TransferStatus::Submitting;
            state.report = None;
            state.last_message = None;
            true
        });
        claimed
    }

    /// Leave `Submitting`. No-op if the upload already settled.
    pub(crate) fn finish_upload(
        &self,
        status: TransferStatus,
        report: Option<TamperingReport>,
        message: Option<String>,
    ) -> bool {
        self.tx.send_if_modified(|state| {
            if !state.status.is_submitting() {
                return false;
            }
            state.status = status;
            state.report = report;
            state.last_message = message;
            true
        })
    }

    pub(crate) fn begin_download(&self) -> Result<SelectedFile, WorkflowError> {
        let mut claimed = Err(WorkflowError::NoFileSelected("download"));
        self.tx.send_if_modified(|state| {
            let Some(file) = state.selected.as_ref() else {
                return false;
            };
            if state.status.is_submitting() {
                claimed = Err(WorkflowError::Busy("upload"));
                return false;
            }
            if state.downloading {
                claimed = Err(WorkflowError::Busy("download"));
                return false;
            }
            claimed = Ok(file.clone());
            state.downloading = true;
            true
        });
        claimed
    }

    pub(crate) fn finish_download(&self) {
        self.tx.send_if_modified(|state| std::mem::replace(&mut state.downloading, false));
    }
}
