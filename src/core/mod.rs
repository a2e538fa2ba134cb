//! Core generation logic.
//!
//! This module contains:
//! - Slug: title to URL identifier
//! - Prompts: per-category instruction templates
//! - Requester: model call and reply validation
//! - Assets: best-effort cover download
//! - Writer: front-matter rendering and persistence
//! - Orchestrator: the pipeline tying them together

pub mod assets;
pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod requester;
pub mod slug;
pub mod writer;

// Re-export commonly used types
pub use assets::AssetFetcher;
pub use error::GenerationError;
pub use orchestrator::{GenerationOutcome, Orchestrator};
pub use prompts::build_prompt;
pub use requester::{parse_article, ContentRequester};
pub use slug::{slugify, Slug};
pub use writer::{CollisionStrategy, CoverRef, DocumentWriter, OutputPaths, WriterSettings};
