//! Domain types for motori.
//!
//! This module contains the core data structures:
//! - Category: the three site collections and their naming table
//! - Article: generation requests and validated model output
//! - FrontMatter: the read-side schema of a written document

pub mod article;
pub mod category;
pub mod frontmatter;

// Re-export commonly used types
pub use article::{GeneratedArticle, GenerationRequest, DEFAULT_BRIEF};
pub use category::Category;
pub use frontmatter::{check_tree, parse_document, DocumentCheck, FrontMatter, ParsedDocument};
