//! Unsplash photo search adapter.
//!
//! Endpoint: GET /search/photos?per_page=1&query=...
//! Auth: `Authorization: Client-ID <access key>`

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tracing::debug;

use super::{error_body, ImageSource};
use crate::core::error::{GenerationError, Result};

const SERVICE: &str = "Unsplash";

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";

/// Unsplash search client
#[derive(Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    access_key: String,
    base_url: String,
}

impl fmt::Debug for UnsplashClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsplashClient")
            .field("access_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Response from the search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    urls: PhotoUrls,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
    full: Option<String>,
    small: Option<String>,
}

impl PhotoUrls {
    /// Preferred resolution: regular, then full, then small. Empty URLs are skipped.
    fn best(self) -> Option<String> {
        [self.regular, self.full, self.small]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
    }
}

impl UnsplashClient {
    /// Create a new client
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_key: access_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a per-request timeout to search and download
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Self::transport)?;
        Ok(self)
    }

    fn transport(source: reqwest::Error) -> GenerationError {
        GenerationError::Transport {
            service: SERVICE,
            source,
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(GenerationError::UpstreamResponse {
            service: SERVICE,
            status: status.as_u16(),
            body: error_body(response).await,
        })
    }
}

/// First result's best URL
fn pick_url(body: &str) -> Result<Option<String>> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::AssetFetch(format!("Unexpected search response: {}", e)))?;

    Ok(parsed
        .results
        .into_iter()
        .next()
        .and_then(|photo| photo.urls.best()))
}

#[async_trait]
impl ImageSource for UnsplashClient {
    fn name(&self) -> &str {
        "unsplash"
    }

    async fn search(&self, query: &str) -> Result<Option<String>> {
        debug!(%query, "Searching cover photo");

        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[("per_page", "1"), ("query", query)])
            .header(header::AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .send()
            .await
            .map_err(Self::transport)?;

        let body = Self::ensure_success(response)
            .await?
            .text()
            .await
            .map_err(Self::transport)?;

        pick_url(&body)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Self::transport)?;

        let bytes = Self::ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(Self::transport)?;

        Ok(bytes.to_vec())
    }
}
