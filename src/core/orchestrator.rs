//! Main orchestrator for article generation.
//!
//! Runs the linear pipeline prompt -> model -> slug -> cover -> document
//! and logs each stage.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

use crate::adapters::{ImageSource, OpenAiGenerator, TextGenerator, UnsplashClient};
use crate::config::GeneratorConfig;
use crate::domain::GenerationRequest;

use super::assets::AssetFetcher;
use super::error::Result;
use super::requester::ContentRequester;
use super::slug::Slug;
use super::writer::{CoverRef, DocumentWriter};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub slug: Slug,
    pub title: String,
    pub document_path: PathBuf,
    /// Set only when a cover was actually downloaded
    pub cover_path: Option<PathBuf>,
}

/// Main generation orchestrator
pub struct Orchestrator {
    requester: ContentRequester,
    assets: AssetFetcher,
    writer: DocumentWriter,
}

impl Orchestrator {
    /// Create an orchestrator from explicit components
    pub fn new(
        generator: Box<dyn TextGenerator>,
        images: Option<Box<dyn ImageSource>>,
        writer: DocumentWriter,
    ) -> Self {
        Self {
            requester: ContentRequester::new(generator),
            assets: AssetFetcher::new(images),
            writer,
        }
    }

    /// Wire the real OpenAI and Unsplash clients from configuration
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config.require_openai_key()?;

        let mut generator = OpenAiGenerator::new(api_key)
            .with_model(&config.model)
            .with_temperature(config.temperature);
        if let Some(url) = &config.openai_base_url {
            generator = generator.with_base_url(url);
        }
        if let Some(timeout) = config.request_timeout() {
            generator = generator.with_timeout(timeout)?;
        }

        let images = match &config.unsplash_access_key {
            Some(key) => {
                let mut client = UnsplashClient::new(key);
                if let Some(url) = &config.unsplash_base_url {
                    client = client.with_base_url(url);
                }
                if let Some(timeout) = config.request_timeout() {
                    client = client.with_timeout(timeout)?;
                }
                Some(Box::new(client) as Box<dyn ImageSource>)
            }
            None => None,
        };

        Ok(Self::new(
            Box::new(generator),
            images,
            DocumentWriter::new(config.writer.clone()),
        ))
    }

    /// Whether cover downloads are enabled
    pub fn covers_enabled(&self) -> bool {
        self.assets.is_enabled()
    }

    /// Generate one article now
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        self.run_at(request, Utc::now()).await
    }

    /// Generate one article as if the clock read `now`
    #[instrument(skip(self, request, now), fields(category = %request.category))]
    pub async fn run_at(
        &self,
        request: &GenerationRequest,
        now: DateTime<Utc>,
    ) -> Result<GenerationOutcome> {
        info!(brief = %request.brief, backend = self.requester.backend(), "Generating article");

        // Nothing is written unless the model reply validates
        let article = match self.requester.request(request).await {
            Ok(article) => article,
            Err(e) => {
                // One-line summary; the caller reports the full error
                error!(kind = e.kind(), "Content generation failed");
                return Err(e);
            }
        };
        info!(title = %article.title, "Article text received");

        let slug = Slug::from_title(&article.title);
        let paths = self.writer.plan(request.category, &slug, now);

        let query = request.cover_query(&article.title);
        let cover = if self.assets.fetch(query, &paths.image).await {
            CoverRef::Fetched(paths.image_file.clone())
        } else {
            CoverRef::Placeholder
        };

        let content = self.writer.render(&article, request.category, &cover, now);
        self.writer.write(&paths, &content).await?;

        info!(path = %paths.document.display(), "Article created");

        Ok(GenerationOutcome {
            slug,
            title: article.title,
            document_path: paths.document,
            cover_path: matches!(cover, CoverRef::Fetched(_)).then_some(paths.image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::writer::WriterSettings;

    #[test]
    fn test_from_config_requires_openai_key() {
        let config = GeneratorConfig::default();
        let result = Orchestrator::from_config(&config);
        assert!(matches!(
            result,
            Err(crate::core::error::GenerationError::Configuration(_))
        ));
    }

    #[test]
    fn test_covers_follow_unsplash_key() {
        let mut config = GeneratorConfig {
            openai_api_key: Some("sk-test".to_string()),
            writer: WriterSettings::default(),
            ..Default::default()
        };
        let orchestrator = Orchestrator::from_config(&config).unwrap();
        assert!(!orchestrator.covers_enabled());

        config.unsplash_access_key = Some("access".to_string());
        let orchestrator = Orchestrator::from_config(&config).unwrap();
        assert!(orchestrator.covers_enabled());
    }

    #[test]
    fn test_timeout_applies_to_both_clients() {
        let config = GeneratorConfig {
            openai_api_key: Some("sk-test".to_string()),
            unsplash_access_key: Some("access".to_string()),
            timeout_seconds: Some(3),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Some(std::time::Duration::from_secs(3)));

        let orchestrator = Orchestrator::from_config(&config).unwrap();
        assert!(orchestrator.covers_enabled());
    }
}
