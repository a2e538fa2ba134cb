//! Adapter interfaces for external services.
//!
//! Adapters give the orchestrator a narrow interface to the hosted text
//! model and the stock photo search, so both can be swapped for fakes.

pub mod openai;
pub mod unsplash;

use async_trait::async_trait;

use crate::core::error::Result;

// Re-export the concrete clients
pub use openai::OpenAiGenerator;
pub use unsplash::UnsplashClient;

/// Text generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Send a prompt and return the raw reply text
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Stock photo backend
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Best image URL for a query, `None` when nothing matches
    async fn search(&self, query: &str) -> Result<Option<String>>;

    /// Download an image
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// Read an error body without masking the status on failure
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default().trim().to_string()
}
