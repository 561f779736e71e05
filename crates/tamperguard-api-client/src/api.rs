//! Service methods: video upload, download lookup and artifact fetch.

use crate::{decode_json, ApiClient, ApiError, ApiResult};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::time::Instant;
use tamperguard_core::constants::{
    DOWNLOAD_PATH, DOWNLOAD_QUERY_PARAM, UPLOAD_FIELD_NAME, UPLOAD_PATH,
};
use tamperguard_core::{DownloadReply, SelectedFile, UploadReply};

impl ApiClient {
    /// Upload a selected video for analysis.
    ///
    /// Sends one multipart part named `video` carrying the file bytes, name
    /// and content type. The reply is returned unclassified; an empty or
    /// `null` body decodes to a reply without a status.
    pub async fn upload_video(&self, file: &SelectedFile) -> ApiResult<UploadReply> {
        let part = Part::stream_with_length(file.content(), file.size() as u64)
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        tracing::info!(
            file_name = %file.name(),
            size_bytes = file.size(),
            "Uploading video for analysis"
        );

        let body = self.post_multipart(UPLOAD_PATH, form).await?;
        decode_upload_reply(&body)
    }

    /// Ask the service for a locator of the processed object `object_name`.
    pub async fn lookup_download(&self, object_name: &str) -> ApiResult<DownloadReply> {
        self.get(
            DOWNLOAD_PATH,
            &[(DOWNLOAD_QUERY_PARAM, object_name.to_string())],
        )
        .await
    }

    /// Fetch the bytes behind an absolute locator returned by
    /// [`ApiClient::lookup_download`]. Presigned locators carry their own
    /// credentials, so no auth header is added.
    pub async fn fetch_artifact(&self, url: &str) -> ApiResult<Bytes> {
        let start = Instant::now();
        let response = self.client().get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    format!("Artifact fetch failed with status {}", status)
                } else {
                    body.trim().to_string()
                },
            });
        }

        let data = response.bytes().await?;
        tracing::info!(
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched processed artifact"
        );
        Ok(data)
    }
}

fn decode_upload_reply(body: &[u8]) -> ApiResult<UploadReply> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UploadReply::default());
    }
    decode_json::<Option<UploadReply>>(body).map(Option::unwrap_or_default)
}
