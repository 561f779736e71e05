//! Save capability for processed artifacts.
//!
//! The controller never touches the filesystem; it hands a name and a
//! locator to a [`BlobSaver`]. [`FileSystemSaver`] is the terminal
//! implementation: it fetches the locator and writes the bytes into a
//! directory through a temporary file that only becomes visible under the
//! final name once fully written. A save whose future is dropped (for
//! example by a timeout) never renames its temporary file into place.

use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tamperguard_api_client::ApiClient;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid artifact name: {0:?}")]
    InvalidName(String),

    #[error("Save cancelled before the artifact was written")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedArtifact {
    pub name: String,
    pub locator: String,
    /// Local path, when the saver writes to disk.
    pub path: Option<PathBuf>,
    pub size_bytes: Option<u64>,
}

#[async_trait]
pub trait BlobSaver: Send + Sync {
    /// Save the resource at `locator` under `name`.
    async fn save_blob(&self, name: &str, locator: &str) -> Result<SavedArtifact, SaveError>;
}

/// Downloads artifacts into a local directory.
#[derive(Clone, Debug)]
pub struct FileSystemSaver {
    client: ApiClient,
    dir: PathBuf,
}

impl FileSystemSaver {
    pub fn new(client: ApiClient, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    /// Reject names that would escape the target directory.
    fn target_path(&self, name: &str) -> Result<PathBuf, SaveError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed.contains("..")
            || trimmed.contains('/')
            || trimmed.contains('\\')
        {
            return Err(SaveError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(trimmed))
    }
}

#[async_trait]
impl BlobSaver for FileSystemSaver {
    async fn save_blob(&self, name: &str, locator: &str) -> Result<SavedArtifact, SaveError> {
        let target = self.target_path(name)?;
        let start = Instant::now();

        let data = self
            .client
            .fetch_artifact(locator)
            .await
            .map_err(|e| SaveError::Fetch(e.user_message()))?;
        let size = data.len() as u64;

        let cancelled = Arc::new(AtomicBool::new(false));
        let _cancel_on_drop = CancelOnDrop(cancelled.clone());

        let dir = self.dir.clone();
        let final_path = target.clone();
        tokio::task::spawn_blocking(move || write_artifact(&dir, &final_path, &data, &cancelled))
            .await
            .map_err(|e| SaveError::Io(std::io::Error::other(e)))??;

        tracing::info!(
            path = %target.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Saved processed artifact"
        );

        Ok(SavedArtifact {
            name: name.trim().to_string(),
            locator: locator.to_string(),
            path: Some(target),
            size_bytes: Some(size),
        })
    }
}

/// Flags the blocking write as abandoned once the save future goes away.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn write_artifact(
    dir: &Path,
    target: &Path,
    data: &[u8],
    cancelled: &AtomicBool,
) -> Result<(), SaveError> {
    std::fs::create_dir_all(dir)?;
    // Dropped (and deleted) on any early return before persist.
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    if cancelled.load(Ordering::SeqCst) {
        return Err(SaveError::Cancelled);
    }
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
