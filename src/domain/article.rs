//! Requests and generated articles.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Brief used when none is supplied
pub const DEFAULT_BRIEF: &str = "Novità automotive";

/// Input for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Target collection
    pub category: Category,

    /// Free-text topic handed to the model
    pub brief: String,

    /// Cover photo search query (defaults to the brief)
    #[serde(default)]
    pub image_query: Option<String>,
}

impl GenerationRequest {
    /// Create a request with no explicit image query
    pub fn new(category: Category, brief: impl Into<String>) -> Self {
        Self {
            category,
            brief: brief.into(),
            image_query: None,
        }
    }

    /// Set the cover search query
    pub fn with_image_query(mut self, query: impl Into<String>) -> Self {
        self.image_query = Some(query.into());
        self
    }

    /// Query for the cover search: explicit query, then brief, then title
    pub fn cover_query<'a>(&'a self, title: &'a str) -> &'a str {
        [self.image_query.as_deref(), Some(self.brief.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|q| !q.is_empty())
            .unwrap_or(title)
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::new(Category::default(), DEFAULT_BRIEF)
    }
}

/// Article text returned by the model, already validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub title: String,
    pub description: String,
    /// Simple HTML (`<p>`, `<h2>`, `<ul>`)
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_query_precedence() {
        let request = GenerationRequest::new(Category::News, "Nuova Panda");
        assert_eq!(request.cover_query("Titolo"), "Nuova Panda");

        let request = request.with_image_query("fiat panda 2025");
        assert_eq!(request.cover_query("Titolo"), "fiat panda 2025");

        let blank = GenerationRequest::new(Category::News, "  ").with_image_query("");
        assert_eq!(blank.cover_query("Titolo"), "Titolo");
    }

    #[test]
    fn test_default_request() {
        let request = GenerationRequest::default();
        assert_eq!(request.category, Category::News);
        assert_eq!(request.brief, DEFAULT_BRIEF);
        assert!(request.image_query.is_none());
    }
}
