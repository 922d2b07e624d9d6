//! Test helpers and fixtures for srgplay-media tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::http::HttpFetch;

/// In-memory [`HttpFetch`] that records every requested URL.
///
/// Routes match on exact URL first, then on the longest registered prefix.
#[derive(Default)]
pub struct FakeHttp {
    routes: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(url.to_string(), body.to_string());
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    pub fn requested(&self, prefix: &str) -> bool {
        self.requests().iter().any(|url| url.starts_with(prefix))
    }
}

#[async_trait]
impl HttpFetch for FakeHttp {
    async fn open_url(&self, url: &str, _use_cache: bool) -> Result<String, FetchError> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(url.to_string());

        if let Some(body) = self.routes.get(url) {
            return Ok(body.clone());
        }
        self.routes
            .iter()
            .filter(|(route, _)| url.starts_with(route.as_str()))
            .max_by_key(|(route, _)| route.len())
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FetchError::Network(format!("no route for {url}")))
    }
}

/// Token service response carrying `authparams`.
pub fn token_body(authparams: &str) -> String {
    format!(r#"{{"token": {{"authparams": "{authparams}"}}}}"#)
}

pub const TOKEN_ENDPOINT: &str = "http://tp.srgssr.ch/akahd/token";
pub const IL_BASE: &str = "https://il.srgssr.ch/integrationlayer/2.0";
