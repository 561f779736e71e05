//! Error types module
//!
//! `ValidationError` covers a rejected file pick. `WorkflowError` is the full
//! taxonomy returned by the transfer controller: every variant is recoverable
//! and leaves the workflow in an interactive state.

use std::time::Duration;

use crate::constants::{DEFAULT_DOWNLOAD_ERROR_MESSAGE, SUPPORTED_VIDEO_CONTENT_TYPE};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for service replies the client cannot use
    Warn,
    /// Error level - for transport failures
    Error,
}

/// Reasons a candidate file is refused by the selection step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported content type: {mime_type} (expected: {expected})")]
    UnsupportedType {
        mime_type: String,
        expected: &'static str,
    },

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

impl ValidationError {
    pub fn unsupported(mime_type: impl Into<String>) -> Self {
        ValidationError::UnsupportedType {
            mime_type: mime_type.into(),
            expected: SUPPORTED_VIDEO_CONTENT_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No file selected for {0}")]
    NoFileSelected(&'static str),

    #[error("Another {0} is already in progress")]
    Busy(&'static str),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Service reply did not contain a download URL")]
    NoDownloadUrl,

    #[error("Unrecognized service status: {}", .0.as_deref().unwrap_or("<missing>"))]
    UnrecognizedStatus(Option<String>),

    #[error("Failed to save artifact: {0}")]
    Save(String),
}

impl WorkflowError {
    /// Text surfaced to the user when this error ends an action.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(ValidationError::UnsupportedType { .. }) => {
                "Please upload a valid .mp4 file.".to_string()
            }
            WorkflowError::Validation(ValidationError::InvalidFilename(_)) => {
                "The selected file has no usable name.".to_string()
            }
            WorkflowError::NoFileSelected("download") => {
                "No file selected to download.".to_string()
            }
            WorkflowError::NoFileSelected(operation) => {
                format!("No file selected for {}.", operation)
            }
            WorkflowError::Busy(operation) => {
                format!("Please wait for the current {} to finish.", operation)
            }
            WorkflowError::Transfer(message) => message.clone(),
            WorkflowError::Timeout { operation, after } => format!(
                "The {} did not complete within {:?}. Please try again.",
                operation, after
            ),
            WorkflowError::NoDownloadUrl => "Failed to fetch the download URL.".to_string(),
            WorkflowError::UnrecognizedStatus(_) => {
                "The service returned a response that could not be understood.".to_string()
            }
            WorkflowError::Save(_) => DEFAULT_DOWNLOAD_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            WorkflowError::Validation(_)
            | WorkflowError::NoFileSelected(_)
            | WorkflowError::Busy(_) => LogLevel::Debug,
            WorkflowError::NoDownloadUrl | WorkflowError::UnrecognizedStatus(_) => LogLevel::Warn,
            WorkflowError::Transfer(_) | WorkflowError::Timeout { .. } | WorkflowError::Save(_) => {
                LogLevel::Error
            }
        }
    }
}
