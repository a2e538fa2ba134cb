//! Best-effort cover photo download.

use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::adapters::ImageSource;

use super::error::{GenerationError, Result};

/// Downloads a cover photo when an image source is configured
pub struct AssetFetcher {
    source: Option<Box<dyn ImageSource>>,
}

impl AssetFetcher {
    pub fn new(source: Option<Box<dyn ImageSource>>) -> Self {
        Self { source }
    }

    /// Fetcher that never downloads anything
    pub fn disabled() -> Self {
        Self { source: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Try to store a photo for `query` at `dest`.
    ///
    /// Returns `false` when no source is configured, nothing matched, or
    /// anything failed along the way. Failures are logged, never returned.
    pub async fn fetch(&self, query: &str, dest: &Path) -> bool {
        let Some(source) = self.source.as_deref() else {
            return false;
        };

        match fetch_into(source, query, dest).await {
            Ok(true) => {
                info!(path = %dest.display(), source = source.name(), "Cover downloaded");
                true
            }
            Ok(false) => {
                warn!(%query, "No cover photo found, using placeholder");
                false
            }
            Err(e) => {
                warn!(%query, error = %e, "Cover download failed, using placeholder");
                false
            }
        }
    }
}

async fn fetch_into(source: &dyn ImageSource, query: &str, dest: &Path) -> Result<bool> {
    let Some(url) = source.search(query).await? else {
        return Ok(false);
    };

    let bytes = source.download(&url).await?;
    if bytes.is_empty() {
        return Err(GenerationError::AssetFetch(format!("Empty image body from {}", url)));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| GenerationError::filesystem(parent, e))?;
    }
    fs::write(dest, &bytes)
        .await
        .map_err(|e| GenerationError::filesystem(dest, e))?;

    Ok(true)
}
