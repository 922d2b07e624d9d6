//! Shared error types
//!
//! Transport errors raised by the HTTP layer and the resolution failures
//! surfaced by the stream pipeline.

use thiserror::Error;

/// Maximum response body size for integration layer calls (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Error returned by an [`HttpFetch`](crate::http::HttpFetch) implementation.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

/// Why a stream could not be resolved.
///
/// Every variant is terminal for the current request. Token service
/// failures never show up here: the pipeline keeps going with the
/// unauthorized URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Chapter not found: {id}")]
    ChapterNotFound { id: String },

    #[error("Segment not found: {id}")]
    SegmentNotFound { id: String },

    #[error("No playable resource for chapter {chapter}")]
    NoResource { chapter: String },
}

impl ResolveError {
    /// True when the composition document could not be obtained at all.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Parse(_))
    }
}

/// Read a response body with size limit.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes.
pub async fn text_with_limit(response: reqwest::Response) -> Result<String, FetchError> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(FetchError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(FetchError::ResponseTooLarge { size: bytes.len() as u64 });
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
