//! Replies of the remote service and their classified form.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    DEFAULT_MODIFIED_MESSAGE, DEFAULT_UNCHANGED_MESSAGE, DEFAULT_UPLOADED_MESSAGE,
};
use crate::error::WorkflowError;
use crate::models::TamperingReport;

/// Raw JSON body returned by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_frame_ids")]
    pub missing_frames: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_frame_ids")]
    pub tampered_frames: Option<Vec<String>>,
    /// Hex encoded key the service generated for a first upload.
    #[serde(default)]
    pub key: Option<String>,
}

/// Any non-string status is kept as its JSON text so it can be reported.
fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(status)) => Some(status),
        Some(other) => Some(other.to_string()),
    })
}

/// The service reports frame positions as integers; older deployments send strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrameId {
    Index(i64),
    Text(String),
}

impl From<FrameId> for String {
    fn from(id: FrameId) -> Self {
        match id {
            FrameId::Index(i) => i.to_string(),
            FrameId::Text(s) => s,
        }
    }
}

fn deserialize_frame_ids<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Option<Vec<FrameId>> = Option::deserialize(deserializer)?;
    Ok(ids.map(|ids| ids.into_iter().map(String::from).collect()))
}

/// Classified outcome of an upload reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServiceResponse {
    Unchanged {
        message: Option<String>,
    },
    Modified {
        message: Option<String>,
        report: TamperingReport,
    },
    Uploaded {
        message: Option<String>,
        key: Option<String>,
    },
}

impl ServiceResponse {
    pub fn message(&self) -> Option<&str> {
        match self {
            ServiceResponse::Unchanged { message }
            | ServiceResponse::Modified { message, .. }
            | ServiceResponse::Uploaded { message, .. } => message.as_deref(),
        }
    }

    /// The service's message, or the per-status default when it sent none.
    pub fn message_or_default(&self) -> String {
        let default = match self {
            ServiceResponse::Unchanged { .. } => DEFAULT_UNCHANGED_MESSAGE,
            ServiceResponse::Modified { .. } => DEFAULT_MODIFIED_MESSAGE,
            ServiceResponse::Uploaded { .. } => DEFAULT_UPLOADED_MESSAGE,
        };
        self.message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    }

    pub fn report(&self) -> Option<&TamperingReport> {
        match self {
            ServiceResponse::Modified { report, .. } => Some(report),
            _ => None,
        }
    }
}

impl UploadReply {
    /// Map the raw `status` field onto [`ServiceResponse`].
    ///
    /// A `modified` reply without frame lists still classifies, with empty lists.
    pub fn classify(self) -> Result<ServiceResponse, WorkflowError> {
        let UploadReply {
            status,
            message,
            missing_frames,
            tampered_frames,
            key,
        } = self;

        match status.as_deref() {
            Some("unchanged") => Ok(ServiceResponse::Unchanged { message }),
            Some("modified") => Ok(ServiceResponse::Modified {
                message,
                report: TamperingReport::new(
                    missing_frames.unwrap_or_default(),
                    tampered_frames.unwrap_or_default(),
                ),
            }),
            Some("uploaded") => Ok(ServiceResponse::Uploaded { message, key }),
            _ => Err(WorkflowError::UnrecognizedStatus(status.clone())),
        }
    }
}

/// Raw JSON body returned by the download endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReply {
    #[serde(default)]
    pub url: Option<String>,
}

impl DownloadReply {
    /// The locator, if the service sent a non-empty one.
    pub fn locator(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Body the service sends with 4xx/5xx replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
