//! Fixed values of the remote service contract.

/// The only content type accepted by the selection step.
pub const SUPPORTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Prefix the service puts in front of a processed object's name.
pub const ENCRYPTED_PREFIX: &str = "encrypted_";

/// Multipart field carrying the video bytes.
pub const UPLOAD_FIELD_NAME: &str = "video";

pub const UPLOAD_PATH: &str = "/upload";
pub const DOWNLOAD_PATH: &str = "/download";

/// Query parameter naming the object to look up on the download endpoint.
pub const DOWNLOAD_QUERY_PARAM: &str = "filename";

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_UNCHANGED_MESSAGE: &str = "File already exists but has not been tampered!";
pub const DEFAULT_MODIFIED_MESSAGE: &str = "File has been tampered!";
pub const DEFAULT_UPLOADED_MESSAGE: &str = "File uploaded and processed successfully!";
pub const DEFAULT_TRANSFER_ERROR_MESSAGE: &str = "Error during upload. Please try again.";
pub const DEFAULT_DOWNLOAD_ERROR_MESSAGE: &str = "Error during download. Please try again.";
