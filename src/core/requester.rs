//! Turns a generation request into a validated article.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::adapters::TextGenerator;
use crate::domain::{GeneratedArticle, GenerationRequest};

use super::error::{GenerationError, Result};
use super::prompts::{build_prompt, SYSTEM_PROMPT};

/// Asks the model for an article and validates the reply
pub struct ContentRequester {
    generator: Box<dyn TextGenerator>,
}

impl ContentRequester {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Name of the underlying backend
    pub fn backend(&self) -> &str {
        self.generator.name()
    }

    /// Single attempt: any failure is returned as-is
    #[instrument(skip(self, request), fields(category = %request.category, backend = self.generator.name()))]
    pub async fn request(&self, request: &GenerationRequest) -> Result<GeneratedArticle> {
        let prompt = build_prompt(request.category, &request.brief);
        let raw = self.generator.generate(SYSTEM_PROMPT, &prompt).await?;
        debug!(reply_len = raw.len(), "Model replied");
        parse_article(&raw)
    }
}

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse the reply, falling back to the outermost `{...}` span
fn parse_json_object(raw: &str) -> Result<Map<String, Value>> {
    let cleaned = strip_code_fences(raw);

    let value = serde_json::from_str::<Value>(cleaned).or_else(|first_err| {
        match (cleaned.find('{'), cleaned.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str::<Value>(&cleaned[start..=end])
            }
            _ => Err(first_err),
        }
    });

    match value {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GenerationError::InvalidResponse {
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
            raw: raw.to_string(),
        }),
        Err(e) => Err(GenerationError::InvalidResponse {
            reason: format!("not valid JSON: {}", e),
            raw: raw.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate a raw model reply into an article.
///
/// All of `title`, `description` and `body` must be non-empty strings.
pub fn parse_article(raw: &str) -> Result<GeneratedArticle> {
    let mut map = parse_json_object(raw)?;

    let mut missing = Vec::new();
    let mut take = |key: &'static str| match map.remove(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => {
            missing.push(key);
            None
        }
    };

    let title = take("title");
    let description = take("description");
    let body = take("body");

    match (title, description, body) {
        (Some(title), Some(description), Some(body)) => Ok(GeneratedArticle {
            title,
            description,
            body,
        }),
        _ => Err(GenerationError::IncompleteResponse {
            missing,
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"title":"T","description":"D","body":"<p>x</p>"}"#;

    #[test]
    fn test_plain_json() {
        let article = parse_article(VALID).unwrap();
        assert_eq!(article.title, "T");
        assert_eq!(article.description, "D");
        assert_eq!(article.body, "<p>x</p>");
    }

    #[test]
    fn test_fenced_json() {
        let raw = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_article(&raw).unwrap().title, "T");

        let raw = format!("```\n{}\n```\n", VALID);
        assert_eq!(parse_article(&raw).unwrap().title, "T");
    }

    #[test]
    fn test_json_after_preamble() {
        let raw = format!("Ecco l'articolo richiesto:\n{}", VALID);
        assert_eq!(parse_article(&raw).unwrap().body, "<p>x</p>");
    }

    #[test]
    fn test_not_json_is_invalid() {
        let err = parse_article("Mi dispiace, non posso aiutarti.").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse { .. }));
    }

    #[test]
    fn test_array_is_invalid() {
        let err = parse_article("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse { ref reason, .. } if reason.contains("an array")));
    }

    #[test]
    fn test_missing_body_is_incomplete() {
        let err = parse_article(r#"{"title":"T","description":"D"}"#).unwrap_err();
        match err {
            GenerationError::IncompleteResponse { missing, .. } => assert_eq!(missing, vec!["body"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    struct Echo(&'static str);

    #[async_trait::async_trait]
    impl TextGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
            assert_eq!(system, SYSTEM_PROMPT);
            assert!(prompt.contains("PROVA su strada"));
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_request_uses_category_template() {
        let requester = ContentRequester::new(Box::new(Echo(VALID)));
        let request = GenerationRequest::new(crate::domain::Category::Tests, "Tonale");

        let article = tokio_test::block_on(requester.request(&request)).unwrap();
        assert_eq!(article.title, "T");
        assert_eq!(requester.backend(), "echo");
    }

    #[test]
    fn test_empty_or_non_string_fields_are_incomplete() {
        let err = parse_article(r#"{"title":"  ","description":42,"body":"<p>x</p>"}"#).unwrap_err();
        match err {
            GenerationError::IncompleteResponse { missing, .. } => {
                assert_eq!(missing, vec!["title", "description"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
