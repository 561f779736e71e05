//! HTTP client for the tampering analysis service.
//!
//! Provides a minimal client with an optional API key (sent as X-API-Key),
//! generic GET/multipart POST helpers, and the service methods (video upload,
//! download lookup, artifact fetch). The transfer controller talks to the
//! service through the [`TamperService`] trait implemented here.

pub mod api;
pub mod service;

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tamperguard_core::{ClientConfig, ServiceErrorBody};

pub use service::TamperService;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Authentication strategy for the service.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// Errors returned by [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, TLS, body read).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The service answered 2xx but the body was not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP client for the tampering analysis service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, auth: Option<Auth>) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Build a client from loaded configuration. An API key, when set, is
    /// sent as `X-API-Key`.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::new(
            config.service_url.clone(),
            config.api_key.clone().map(Auth::XApiKey),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(Auth::XApiKey(key)) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client.get(&url));

        if !query.is_empty() {
            request = request.query(query);
        }

        let body = self.send("GET", path, request).await?;
        decode_json(&body)
    }

    /// POST multipart form and return the raw 2xx body.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<Bytes> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        self.send("POST", path, request).await
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> ApiResult<Bytes> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::warn!(method, path, error = %e, "Request to service failed");
            ApiError::Request(e)
        })?;

        let status = response.status();
        tracing::debug!(
            method,
            path,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Service responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        Ok(response.bytes().await?)
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Build an [`ApiError::Status`], preferring the service's `{"error": ...}` text.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.build_url("/upload"), "http://localhost:5000/upload");
    }

    #[test]
    fn status_error_prefers_error_body() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": "No video file uploaded"}"#,
        );
        match &err {
            ApiError::Status { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "No video file uploaded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message(), "No video file uploaded");
    }

    #[test]
    fn status_error_falls_back_to_text_or_reason() {
        match status_error(StatusCode::BAD_GATEWAY, "upstream down") {
            ApiError::Status { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {:?}", other),
        }
        match status_error(StatusCode::INTERNAL_SERVER_ERROR, "") {
            ApiError::Status { message, .. } => assert_eq!(message, "Internal Server Error"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
