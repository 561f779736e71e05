//! Test doubles for the controller's capabilities.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tamperguard_api_client::{ApiError, ApiResult, TamperService};
use tamperguard_core::{DownloadReply, FileCandidate, SelectedFile, UploadReply};
use tamperguard_transfer::{
    BlobSaver, Notice, NoticeLevel, Notifier, SaveError, SavedArtifact, TransferController,
};
use tokio::sync::Notify;

/// Scripted upload behaviour.
#[derive(Clone)]
pub enum UploadScript {
    Reply(UploadReply),
    Fail(u16, &'static str),
    /// Never answers.
    Hang,
    /// Answers with the reply once the gate is opened.
    Gated(Arc<Notify>, UploadReply),
}

#[derive(Clone)]
pub enum LookupScript {
    Reply(DownloadReply),
    Fail(u16, &'static str),
}

pub struct FakeService {
    upload: Mutex<UploadScript>,
    lookup: Mutex<LookupScript>,
    pub uploads: AtomicUsize,
    pub lookups: AtomicUsize,
    pub uploaded_names: Mutex<Vec<String>>,
    pub looked_up: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn new(upload: UploadScript, lookup: LookupScript) -> Arc<Self> {
        Arc::new(Self {
            upload: Mutex::new(upload),
            lookup: Mutex::new(lookup),
            uploads: AtomicUsize::new(0),
            lookups: AtomicUsize::new(0),
            uploaded_names: Mutex::new(Vec::new()),
            looked_up: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(json: &str) -> Arc<Self> {
        Self::new(
            UploadScript::Reply(serde_json::from_str(json).unwrap()),
            LookupScript::Reply(DownloadReply::default()),
        )
    }

    pub fn set_upload(&self, script: UploadScript) {
        *self.upload.lock().unwrap() = script;
    }

    pub fn set_lookup(&self, script: LookupScript) {
        *self.lookup.lock().unwrap() = script;
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TamperService for FakeService {
    async fn upload_video(&self, file: &SelectedFile) -> ApiResult<UploadReply> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.uploaded_names
            .lock()
            .unwrap()
            .push(file.name().to_string());
        let script = self.upload.lock().unwrap().clone();
        match script {
            UploadScript::Reply(reply) => Ok(reply),
            UploadScript::Fail(status, message) => Err(ApiError::Status {
                status,
                message: message.to_string(),
            }),
            UploadScript::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            UploadScript::Gated(gate, reply) => {
                gate.notified().await;
                Ok(reply)
            }
        }
    }

    async fn lookup_download(&self, object_name: &str) -> ApiResult<DownloadReply> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.looked_up
            .lock()
            .unwrap()
            .push(object_name.to_string());
        let script = self.lookup.lock().unwrap().clone();
        match script {
            LookupScript::Reply(reply) => Ok(reply),
            LookupScript::Fail(status, message) => Err(ApiError::Status {
                status,
                message: message.to_string(),
            }),
        }
    }
}

/// Records save requests instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingSaver {
    pub saves: Mutex<Vec<(String, String)>>,
    pub delay: Option<Duration>,
}

impl RecordingSaver {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            saves: Mutex::new(Vec::new()),
            delay: Some(delay),
        }
    }

    pub fn saves(&self) -> Vec<(String, String)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobSaver for RecordingSaver {
    async fn save_blob(&self, name: &str, locator: &str) -> Result<SavedArtifact, SaveError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.saves
            .lock()
            .unwrap()
            .push((name.to_string(), locator.to_string()));
        Ok(SavedArtifact {
            name: name.to_string(),
            locator: locator.to_string(),
            path: None,
            size_bytes: None,
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.text)
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Info)
            .map(|n| n.text)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

pub struct Harness {
    pub controller: TransferController,
    pub service: Arc<FakeService>,
    pub saver: Arc<RecordingSaver>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(service: Arc<FakeService>) -> Harness {
    harness_with_saver(service, RecordingSaver::default())
}

pub fn harness_with_saver(service: Arc<FakeService>, saver: RecordingSaver) -> Harness {
    let saver = Arc::new(saver);
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = TransferController::new(service.clone(), saver.clone(), notifier.clone())
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(5));
    Harness {
        controller,
        service,
        saver,
        notifier,
    }
}

pub fn mp4(name: &str) -> FileCandidate {
    FileCandidate::new(name, b"\x00\x00\x00\x18ftypmp42".to_vec(), "video/mp4")
}
