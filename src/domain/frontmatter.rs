//! Read-side view of generated documents.
//!
//! Mirrors the content collection schema the site build enforces:
//! `title`, `description` and `pubDate` are required strings, `cover` is
//! optional, `categories`/`tags` default to empty lists and `author` to
//! "Redazione". Road tests additionally carry a `score` in `[0, 10]`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use thiserror::Error;

use super::category::Category;

/// Author used when a document omits one
pub const DEFAULT_AUTHOR: &str = "Redazione";

/// Score assumed for road tests without an explicit one
pub const DEFAULT_TEST_SCORE: f64 = 7.5;

const DELIMITER: &str = "---";

/// Keys the site schema declares as plain strings
const STRING_KEYS: [&str; 5] = ["title", "description", "cover", "author", "pubDate"];

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn expect_string<E: serde::de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(E::custom(format!(
            "expected a string, found {}",
            value_kind(&other)
        ))),
    }
}

// A plain `123` or `true` would otherwise be coerced into a String, while
// the site's loader reads it as a number or boolean and rejects it.
fn yaml_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    expect_string(Value::deserialize(deserializer)?)
}

fn yaml_string_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    expect_string(Value::deserialize(deserializer)?).map(Some)
}

fn yaml_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(expect_string::<D::Error>)
        .collect()
}

/// YAML 1.1 timestamp shape: `YYYY-M-D`, optionally followed by a time
fn looks_like_timestamp(scalar: &str) -> bool {
    fn digits(s: &str, min: usize, max: usize) -> Option<&str> {
        let n = s.bytes().take_while(u8::is_ascii_digit).count();
        (min..=max).contains(&n).then(|| &s[n..])
    }

    let date_rest = digits(scalar, 4, 4)
        .and_then(|r| r.strip_prefix('-'))
        .and_then(|r| digits(r, 1, 2))
        .and_then(|r| r.strip_prefix('-'))
        .and_then(|r| digits(r, 1, 2));

    match date_rest {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(['T', 't', ' ', '\t'])
            .map(|r| r.trim_start().starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(false),
        None => false,
    }
}

/// First top-level string key whose value is an unquoted timestamp
fn unquoted_timestamp(yaml: &str) -> Option<&'static str> {
    yaml.lines()
        .filter(|line| !line.starts_with([' ', '\t', '#', '-']))
        .filter_map(|line| line.split_once(':'))
        .find_map(|(key, value)| {
            let key = STRING_KEYS.into_iter().find(|k| *k == key.trim())?;
            let value = value.split(" #").next().unwrap_or("").trim();
            looks_like_timestamp(value).then_some(key)
        })
}

/// Parsed front-matter block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    #[serde(deserialize_with = "yaml_string")]
    pub title: String,
    #[serde(deserialize_with = "yaml_string")]
    pub description: String,
    #[serde(default, deserialize_with = "yaml_string_opt")]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "yaml_strings")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "yaml_strings")]
    pub tags: Vec<String>,
    #[serde(default = "default_author", deserialize_with = "yaml_string")]
    pub author: String,
    #[serde(deserialize_with = "yaml_string")]
    pub pub_date: String,
    /// Only meaningful for the tests collection
    #[serde(default)]
    pub score: Option<f64>,
}

/// A document split into metadata and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("Document does not start with a '---' front-matter block")]
    MissingOpening,

    #[error("Front-matter block is not closed by '---'")]
    MissingClosing,

    #[error("Invalid front-matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Score out of range: {0} (expected 0..=10)")]
    ScoreOutOfRange(f64),

    #[error("'{0}' is an unquoted date; the site reads it as a Date, not a string")]
    UnquotedDate(&'static str),
}

/// Split raw document text into (yaml, body)
pub fn split_document(text: &str) -> Result<(&str, &str), FrontMatterError> {
    let rest = text
        .strip_prefix(DELIMITER)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
        .ok_or(FrontMatterError::MissingOpening)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::MissingClosing)
}

/// Parse a document belonging to `category`
pub fn parse_document(text: &str, category: Category) -> Result<ParsedDocument, FrontMatterError> {
    let (yaml, body) = split_document(text)?;
    let mut front_matter: FrontMatter = serde_yaml::from_str(yaml)?;

    if let Some(key) = unquoted_timestamp(yaml) {
        return Err(FrontMatterError::UnquotedDate(key));
    }

    if category == Category::Tests {
        let score = front_matter.score.unwrap_or(DEFAULT_TEST_SCORE);
        if !(0.0..=10.0).contains(&score) {
            return Err(FrontMatterError::ScoreOutOfRange(score));
        }
        front_matter.score = Some(score);
    } else {
        front_matter.score = None;
    }

    Ok(ParsedDocument {
        front_matter,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

/// Result of checking one file
#[derive(Debug)]
pub struct DocumentCheck {
    pub path: PathBuf,
    pub category: Category,
    pub outcome: std::result::Result<FrontMatter, String>,
}

impl DocumentCheck {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Check every `<root>/<category>/*.md` document
pub fn check_tree(content_root: &Path) -> Result<Vec<DocumentCheck>> {
    let mut checks = Vec::new();

    for category in Category::ALL {
        let dir = content_root.join(category.dir_name());
        let pattern = format!("{}/*.md", glob::Pattern::escape(&dir.to_string_lossy()));

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?
            .filter_map(|entry| entry.ok())
            .collect();
        paths.sort();

        for path in paths {
            let outcome = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read: {}", e))
                .and_then(|text| {
                    parse_document(&text, category)
                        .map(|doc| doc.front_matter)
                        .map_err(|e| e.to_string())
                });

            checks.push(DocumentCheck {
                path,
                category,
                outcome,
            });
        }
    }

    Ok(checks)
}
