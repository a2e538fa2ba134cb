//! motori - LLM-assisted article drafting for a static motoring blog
//!
//! Each run asks a hosted language model for one Italian article in a
//! given category, validates the JSON reply, optionally downloads a cover
//! photo, and writes a Markdown file with YAML front-matter that the site
//! build picks up.
//!
//! # Modules
//!
//! - `adapters`: External services (OpenAI chat completions, Unsplash)
//! - `core`: Generation pipeline (slug, prompts, requester, writer)
//! - `domain`: Data structures (Category, GenerationRequest, FrontMatter)
//! - `config`: Config file discovery and defaults
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Draft a news piece
//! OPENAI_API_KEY=sk-... motori generate --category news --brief "Nuova Panda elettrica"
//!
//! # Validate every document before building the site
//! motori check
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::config::GeneratorConfig;
pub use crate::core::{GenerationError, GenerationOutcome, Orchestrator};
pub use crate::domain::{Category, GeneratedArticle, GenerationRequest};
