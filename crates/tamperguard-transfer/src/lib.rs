//! Tamperguard transfer layer
//!
//! Hosts the workflow controller that turns a picked file into an upload,
//! interprets the service's verdict and retrieves the processed artifact.
//! State lives in an explicit [`StateStore`]; user notifications and the
//! save mechanism are injected capabilities, so the controller runs the
//! same way behind a terminal, a GUI or a test double.

pub mod controller;
pub mod notify;
pub mod saver;
pub mod state;

pub use controller::{Outcome, TransferController};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use saver::{BlobSaver, FileSystemSaver, SaveError, SavedArtifact};
pub use state::{StateStore, WorkflowState};
