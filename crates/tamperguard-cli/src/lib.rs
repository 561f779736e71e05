use anyhow::{Context, Result};
use std::path::Path;
use tamperguard_core::{content_type_for_filename, FileCandidate, TamperingReport};
use tamperguard_transfer::{Notice, NoticeLevel, Notifier, Outcome, WorkflowState};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Content type reported for files whose extension is not recognised.
pub const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize tracing for the CLI binary. Logs go to stderr so stdout stays
/// clean for `--json` output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();
}

fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Line shown while an upload is in flight.
pub fn progress_message(state: &WorkflowState) -> Option<String> {
    if !state.status.shows_progress() {
        return None;
    }
    let name = state.selected.as_ref().map(|f| f.name()).unwrap_or("video");
    Some(format!("Uploading {}...", name))
}

/// Print the progress line to stderr each time an upload starts. Ends when
/// the controller is dropped.
pub fn spawn_progress(mut rx: watch::Receiver<WorkflowState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut shown = false;
        while rx.changed().await.is_ok() {
            let line = progress_message(&rx.borrow_and_update());
            if let Some(line) = line.as_deref().filter(|_| !shown) {
                eprintln!("{}", line);
            }
            shown = line.is_some();
        }
    })
}

/// Read a local file the way a file picker hands it over: name, bytes and a
/// content type derived from the extension.
pub async fn candidate_from_path(path: &Path) -> Result<FileCandidate> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file path: {}", path.display()))?
        .to_string();

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mime_type = content_type_for_filename(&name).unwrap_or(UNKNOWN_CONTENT_TYPE);

    Ok(FileCandidate::new(name, content, mime_type))
}

/// Prints notices to the terminal: info on stdout, errors on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    /// Suppress info notices (used with `--json`).
    pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info if !self.quiet => println!("{}", notice.text),
            NoticeLevel::Info => {}
            NoticeLevel::Error => eprintln!("error: {}", notice.text),
        }
    }
}

/// Human-readable tampering report.
pub fn render_report(report: &TamperingReport) -> String {
    let mut out = String::from("Tampering Detected\n");
    out.push_str(&format!(
        "  Missing Frames: {}\n",
        display_or_none(report.missing_frames_display())
    ));
    out.push_str(&format!(
        "  Tampered Frames: {}",
        display_or_none(report.tampered_frames_display())
    ));
    out
}

/// Extra lines printed after an outcome's message, if any.
pub fn render_outcome_details(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Modified { report, .. } => Some(render_report(report)),
        Outcome::Uploaded { key: Some(key), .. } => Some(format!("Encryption key: {}", key)),
        _ => None,
    }
}

fn display_or_none(s: String) -> String {
    if s.is_empty() {
        "none".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn candidate_from_mp4_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"video")
            .unwrap();

        let candidate = candidate_from_path(&path).await.unwrap();
        assert_eq!(candidate.name, "clip.mp4");
        assert_eq!(candidate.mime_type, "video/mp4");
        assert_eq!(&candidate.content[..], b"video");
    }

    #[tokio::test]
    async fn candidate_with_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.bin");
        std::fs::write(&path, b"x").unwrap();

        let candidate = candidate_from_path(&path).await.unwrap();
        assert_eq!(candidate.mime_type, UNKNOWN_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = candidate_from_path(&dir.path().join("nope.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn report_rendering() {
        let report = TamperingReport::new(
            vec!["12".to_string(), "47".to_string()],
            vec![],
        );
        assert_eq!(
            render_report(&report),
            "Tampering Detected\n  Missing Frames: 12, 47\n  Tampered Frames: none"
        );
    }

    #[test]
    fn outcome_details() {
        let uploaded = Outcome::Uploaded {
            message: "ok".to_string(),
            key: Some("beef".to_string()),
        };
        assert_eq!(
            render_outcome_details(&uploaded).as_deref(),
            Some("Encryption key: beef")
        );

        let unchanged = Outcome::Unchanged {
            message: "same".to_string(),
        };
        assert!(render_outcome_details(&unchanged).is_none());
    }

    #[test]
    fn default_log_filter_is_info() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("debug".to_string())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn progress_only_while_submitting() {
        use tamperguard_core::TransferStatus;

        let mut state = WorkflowState::default();
        assert_eq!(progress_message(&state), None);

        state.status = TransferStatus::Submitting;
        assert_eq!(progress_message(&state).as_deref(), Some("Uploading video..."));

        state.status = TransferStatus::Succeeded;
        assert_eq!(progress_message(&state), None);
    }
}
