//! Seam between the transfer controller and the remote service.

use async_trait::async_trait;
use tamperguard_core::{DownloadReply, SelectedFile, UploadReply};

use crate::{ApiClient, ApiResult};

/// The two requests the workflow sends to the analysis service.
#[async_trait]
pub trait TamperService: Send + Sync {
    /// Submit a video; returns the raw reply.
    async fn upload_video(&self, file: &SelectedFile) -> ApiResult<UploadReply>;

    /// Look up a download locator for a processed object.
    async fn lookup_download(&self, object_name: &str) -> ApiResult<DownloadReply>;
}

#[async_trait]
impl TamperService for ApiClient {
    async fn upload_video(&self, file: &SelectedFile) -> ApiResult<UploadReply> {
        ApiClient::upload_video(self, file).await
    }

    async fn lookup_download(&self, object_name: &str) -> ApiResult<DownloadReply> {
        ApiClient::lookup_download(self, object_name).await
    }
}
