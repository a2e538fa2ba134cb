//! Errors raised while generating an article.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one generation run
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required setting (API key) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Service answered with a non-success HTTP status
    #[error("{service} returned HTTP {status}: {body}")]
    UpstreamResponse {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Request never got an answer
    #[error("Request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Reply is not a JSON object
    #[error("Invalid response from model ({reason}). Raw response:\n{raw}")]
    InvalidResponse { reason: String, raw: String },

    /// Reply is JSON but lacks required fields
    #[error("Incomplete response from model, missing: {}. Raw response:\n{raw}", .missing.join(", "))]
    IncompleteResponse {
        missing: Vec<&'static str>,
        raw: String,
    },

    /// Cover search or download failed (never fatal)
    #[error("Cover fetch failed: {0}")]
    AssetFetch(String),

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerationError {
    /// True when the model reply could not be turned into an article
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::InvalidResponse { .. } | Self::IncompleteResponse { .. }
        )
    }

    /// Short label for one-line log fields; the full message may carry the raw reply
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::UpstreamResponse { .. } => "upstream_response",
            Self::Transport { .. } => "transport",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::IncompleteResponse { .. } => "incomplete_response",
            Self::AssetFetch(_) => "asset_fetch",
            Self::Filesystem { .. } => "filesystem",
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
