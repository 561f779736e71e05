//! File selection validation
//!
//! The picker reports a name, bytes and a content type. Only MP4 video is
//! accepted; anything else is refused before it reaches the workflow state.

use std::path::Path;

use crate::constants::SUPPORTED_VIDEO_CONTENT_TYPE;
use crate::error::ValidationError;
use crate::models::{FileCandidate, SelectedFile};

/// Validate a picked file and turn it into a [`SelectedFile`].
///
/// The comparison ignores case and any parameters (`video/mp4; codecs=avc1`).
pub fn validate_candidate(candidate: FileCandidate) -> Result<SelectedFile, ValidationError> {
    let FileCandidate {
        name,
        content,
        mime_type,
    } = candidate;

    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if essence != SUPPORTED_VIDEO_CONTENT_TYPE {
        tracing::debug!(
            file_name = %name,
            content_type = %mime_type,
            "Rejected file selection with unsupported content type"
        );
        return Err(ValidationError::unsupported(mime_type));
    }

    if name.trim().is_empty() {
        return Err(ValidationError::InvalidFilename(name));
    }

    Ok(SelectedFile::accepted(name, content, essence))
}

/// Content type a file picker would report for `filename`, from its extension.
pub fn content_type_for_filename(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    let content_type = match extension.as_str() {
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        // Documents
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => return None,
    };

    Some(content_type)
}
