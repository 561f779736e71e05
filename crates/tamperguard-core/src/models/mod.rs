//! Domain models
//!
//! Client-side state (selected file, transfer status, tampering report) and
//! the wire forms of the remote service's replies.

pub mod file;
pub mod report;
pub mod response;
pub mod status;

pub use file::{FileCandidate, SelectedFile};
pub use report::TamperingReport;
pub use response::{DownloadReply, ServiceErrorBody, ServiceResponse, UploadReply};
pub use status::TransferStatus;
