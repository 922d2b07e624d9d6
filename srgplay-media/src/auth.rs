//! Akamai token authorization
//!
//! Stream URLs are signed by asking the token service for access
//! parameters covering `/<seg1>/<seg2>/*` of the stream path. A failure
//! here is never fatal: unrestricted content plays without the token.
//! Paths with fewer than two segments leave the missing ones empty.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::error::ResolveError;
use crate::http::{get_json, HttpFetch};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid stream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Token request failed: {0}")]
    Token(#[from] ResolveError),

    #[error("Token response has no authparams")]
    MissingParams,
}

#[derive(Debug, Deserialize)]
struct TokenResp {
    token: Option<TokenData>,
}

#[derive(Debug, Deserialize)]
struct TokenData {
    authparams: Option<String>,
}

/// Access-control pattern for a stream URL: `/<seg1>/<seg2>/*`.
pub fn acl_for(url: &str) -> Result<String, AuthError> {
    let parsed = Url::parse(url)?;
    let mut segments = parsed.path().split('/').skip(1);
    let first = segments.next().unwrap_or_default();
    let second = segments.next().unwrap_or_default();
    Ok(format!("/{first}/{second}/*"))
}

/// Append a raw query string with `?` or `&`.
#[must_use]
pub fn append_query(url: &str, query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

pub struct TokenAuthorizer {
    http: Arc<dyn HttpFetch>,
    token_endpoint: String,
}

impl TokenAuthorizer {
    pub fn new(http: Arc<dyn HttpFetch>, token_endpoint: impl Into<String>) -> Self {
        Self {
            http,
            token_endpoint: token_endpoint.into(),
        }
    }

    /// Token request URL for `url`.
    pub fn token_url(&self, url: &str) -> Result<String, AuthError> {
        Ok(format!("{}?acl={}", self.token_endpoint, acl_for(url)?))
    }

    /// `url` with auth params appended, or `url` unchanged if the token
    /// service cannot help.
    pub async fn authorize(&self, url: &str) -> String {
        match self.auth_params(url).await {
            Ok(params) => {
                debug!(url, "Authorized stream URL");
                append_query(url, &params)
            }
            Err(e) => {
                warn!(url, error = %e, "Stream authorization failed, using unauthorized URL");
                url.to_string()
            }
        }
    }

    async fn auth_params(&self, url: &str) -> Result<String, AuthError> {
        let token_url = self.token_url(url)?;
        let resp: TokenResp = get_json(self.http.as_ref(), &token_url, false).await?;
        resp.token
            .and_then(|token| token.authparams)
            .filter(|params| !params.is_empty())
            .ok_or(AuthError::MissingParams)
    }
}
