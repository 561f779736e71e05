//! Tamperguard Core Library
//!
//! This crate provides the domain model, error types, configuration and file
//! validation shared by the API client, the transfer controller and the CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod selection;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigError};
pub use error::{LogLevel, ValidationError, WorkflowError};
pub use models::{
    DownloadReply, FileCandidate, SelectedFile, ServiceErrorBody, ServiceResponse,
    TamperingReport, TransferStatus, UploadReply,
};
pub use selection::{content_type_for_filename, validate_candidate};
