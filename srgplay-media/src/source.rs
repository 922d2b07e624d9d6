//! Media composition sources
//!
//! The integration layer exposes the same document through two request
//! shapes. Both implementations return a [`MediaComposition`] so the rest
//! of the pipeline never knows which one was used.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::composition::MediaComposition;
use crate::config::{ApiConfig, SourceKind};
use crate::error::ResolveError;
use crate::http::{get_json, HttpFetch};
use crate::urn::Urn;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &'static str;

    /// Request URL for the composition of `urn`.
    fn composition_url(&self, urn: &Urn) -> String;

    async fn fetch(&self, urn: &Urn) -> Result<MediaComposition, ResolveError>;
}

/// `GET <base>/<bu>/mediaComposition/<mediaType>/<id>.json`
pub struct LegacySource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl LegacySource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ContentSource for LegacySource {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn composition_url(&self, urn: &Urn) -> String {
        format!(
            "{}/{}/mediaComposition/{}/{}.json",
            self.base_url, urn.business_unit, urn.media_type, urn.id
        )
    }

    async fn fetch(&self, urn: &Urn) -> Result<MediaComposition, ResolveError> {
        fetch_composition(self.http.as_ref(), &self.composition_url(urn)).await
    }
}

/// `GET <base>/mediaComposition/byUrn/<urn>`
pub struct UrnSource {
    http: Arc<dyn HttpFetch>,
    base_url: String,
}

impl UrnSource {
    pub fn new(http: Arc<dyn HttpFetch>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ContentSource for UrnSource {
    fn name(&self) -> &'static str {
        "urn"
    }

    fn composition_url(&self, urn: &Urn) -> String {
        format!("{}/mediaComposition/byUrn/{urn}", self.base_url)
    }

    async fn fetch(&self, urn: &Urn) -> Result<MediaComposition, ResolveError> {
        fetch_composition(self.http.as_ref(), &self.composition_url(urn)).await
    }
}

async fn fetch_composition(
    http: &dyn HttpFetch,
    url: &str,
) -> Result<MediaComposition, ResolveError> {
    debug!(url, "Fetching media composition");
    get_json(http, url, true).await.inspect_err(|e| {
        warn!(url, error = %e, "Cannot open media composition");
    })
}

/// Source selected by configuration.
#[must_use]
pub fn source_from_config(api: &ApiConfig, http: Arc<dyn HttpFetch>) -> Box<dyn ContentSource> {
    let base_url = api.integration_layer_base();
    match api.source {
        SourceKind::Urn => Box::new(UrnSource::new(http, base_url)),
        SourceKind::Legacy => Box::new(LegacySource::new(http, base_url)),
    }
}
