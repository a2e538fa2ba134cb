//! Front-matter assembly and document persistence.
//!
//! Output layout:
//!
//! ```text
//! <content_root>/<category>/<stem>.md
//! <image_root>/<stem>.jpg
//! ```
//!
//! where `<stem>` is the slug, or `<slug>-<unix millis>` with the
//! timestamp collision strategy.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::domain::{Category, GeneratedArticle};

use super::error::{GenerationError, Result};
use super::slug::Slug;

/// Left untouched for the site build to substitute
pub const BASE_URL_TOKEN: &str = "${import.meta.env.BASE_URL}";

/// What to do when a document with the same slug already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionStrategy {
    /// `<slug>.md`; a rerun with the same title replaces the file
    Overwrite,

    /// `<slug>-<unix millis>.md`; every run gets its own file
    #[default]
    Timestamp,
}

impl std::str::FromStr for CollisionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "timestamp" => Ok(Self::Timestamp),
            _ => anyhow::bail!("Unknown collision strategy: {}", s),
        }
    }
}

impl std::fmt::Display for CollisionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Where the cover field points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverRef {
    /// Image file written under the image root
    Fetched(String),

    /// Static fallback image
    Placeholder,
}

/// Layout and fixed front-matter values
#[derive(Debug, Clone)]
pub struct WriterSettings {
    pub content_root: PathBuf,
    pub image_root: PathBuf,
    /// File name under `images/` used when no cover was fetched
    pub placeholder_image: String,
    pub collision: CollisionStrategy,
    pub author: String,
    pub tags: Vec<String>,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("src/content"),
            image_root: PathBuf::from("public/images"),
            placeholder_image: "placeholder.jpg".to_string(),
            collision: CollisionStrategy::default(),
            author: "Redazione".to_string(),
            tags: vec!["auto".to_string(), "novità".to_string()],
        }
    }
}

/// Resolved output locations for one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub stem: String,
    pub document: PathBuf,
    pub image: PathBuf,
    /// Cover file name relative to `images/`
    pub image_file: String,
}

/// Escape a value for a double-quoted YAML scalar.
///
/// Carriage returns are dropped. Characters YAML does not allow raw inside a
/// scalar (C0/C1 controls, DEL, BOM, U+FFFE/U+FFFF) and line breaks a parser
/// would fold (NEL, LS, PS) are written as escape sequences.
pub fn escape_yaml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\r' => {}
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push('\t'),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            '\0'..='\x1f' | '\x7f'..='\u{9f}' => out.push_str(&format!("\\x{:02X}", c as u32)),
            '\u{feff}' | '\u{fffe}' | '\u{ffff}' => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_yaml(value))
}

pub struct DocumentWriter {
    settings: WriterSettings,
}

impl DocumentWriter {
    pub fn new(settings: WriterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Compute output paths for an article written at `now`
    pub fn plan(&self, category: Category, slug: &Slug, now: DateTime<Utc>) -> OutputPaths {
        let stem = match self.settings.collision {
            CollisionStrategy::Overwrite => slug.stem(None),
            CollisionStrategy::Timestamp => slug.stem(Some(&now.timestamp_millis().to_string())),
        };

        let image_file = format!("{}.jpg", stem);
        OutputPaths {
            document: self
                .settings
                .content_root
                .join(category.dir_name())
                .join(format!("{}.md", stem)),
            image: self.settings.image_root.join(&image_file),
            image_file,
            stem,
        }
    }

    /// Render the full document text
    pub fn render(
        &self,
        article: &GeneratedArticle,
        category: Category,
        cover: &CoverRef,
        now: DateTime<Utc>,
    ) -> String {
        let cover_file = match cover {
            CoverRef::Fetched(file) => file.as_str(),
            CoverRef::Placeholder => self.settings.placeholder_image.as_str(),
        };

        let tags: Vec<String> = self.settings.tags.iter().map(|t| quoted(t)).collect();

        let front_matter = [
            "---".to_string(),
            format!("title: {}", quoted(&article.title)),
            format!("description: {}", quoted(&article.description)),
            format!("cover: \"{}images/{}\"", BASE_URL_TOKEN, escape_yaml(cover_file)),
            format!("categories: [{}]", quoted(category.display_label())),
            format!("tags: [{}]", tags.join(",")),
            format!("author: {}", quoted(&self.settings.author)),
            format!("pubDate: \"{}\"", now.format("%Y-%m-%d")),
            "---".to_string(),
            String::new(),
        ]
        .join("\n");

        format!("{}\n{}\n", front_matter, article.body)
    }

    /// Write a rendered document, creating its directory
    pub async fn write(&self, paths: &OutputPaths, content: &str) -> Result<()> {
        if let Some(dir) = paths.document.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| GenerationError::filesystem(dir, e))?;
        }

        fs::write(&paths.document, content)
            .await
            .map_err(|e| GenerationError::filesystem(&paths.document, e))?;

        debug!(path = %paths.document.display(), bytes = content.len(), "Document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article() -> GeneratedArticle {
        GeneratedArticle {
            title: "T".to_string(),
            description: "D".to_string(),
            body: "<p>x</p>".to_string(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_escape_yaml() {
        assert_eq!(escape_yaml(r#"He said "fast""#), r#"He said \"fast\""#);
        assert_eq!(escape_yaml("a\r\nb"), "a\\nb");
        assert_eq!(escape_yaml(r"C:\auto"), r"C:\\auto");
    }

    #[test]
    fn test_escape_yaml_control_characters() {
        assert_eq!(escape_yaml("Fiat\u{7} 500"), r"Fiat\x07 500");
        assert_eq!(escape_yaml("Esc\u{1b}[1m"), r"Esc\x1B[1m");
        assert_eq!(escape_yaml("Nul\0x"), r"Nul\x00x");
        assert_eq!(escape_yaml("Del\u{7f}"), r"Del\x7F");
        assert_eq!(escape_yaml("C1\u{9b}"), r"C1\x9B");
        assert_eq!(escape_yaml("Nel\u{85}x"), r"Nel\Nx");
        assert_eq!(escape_yaml("a\u{2028}b\u{2029}c"), r"a\Lb\Pc");
        assert_eq!(escape_yaml("\u{feff}bom"), r"\uFEFFbom");
        assert_eq!(escape_yaml("tab\there"), "tab\there");
    }

    #[test]
    fn test_render_exact_layout() {
        let writer = DocumentWriter::new(WriterSettings::default());
        let text = writer.render(&article(), Category::News, &CoverRef::Placeholder, at());

        let expected = "---\n\
            title: \"T\"\n\
            description: \"D\"\n\
            cover: \"${import.meta.env.BASE_URL}images/placeholder.jpg\"\n\
            categories: [\"News\"]\n\
            tags: [\"auto\",\"novità\"]\n\
            author: \"Redazione\"\n\
            pubDate: \"2025-03-01\"\n\
            ---\n\
            \n\
            <p>x</p>\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_fetched_cover_and_label() {
        let writer = DocumentWriter::new(WriterSettings::default());
        let cover = CoverRef::Fetched("t-1.jpg".to_string());
        let text = writer.render(&article(), Category::Tests, &cover, at());

        assert!(text.contains("cover: \"${import.meta.env.BASE_URL}images/t-1.jpg\"\n"));
        assert!(text.contains("categories: [\"Tests\"]\n"));
    }

    #[test]
    fn test_plan_paths() {
        let slug = Slug::from_title("T");
        let overwrite = DocumentWriter::new(WriterSettings {
            collision: CollisionStrategy::Overwrite,
            ..Default::default()
        });
        let paths = overwrite.plan(Category::Guides, &slug, at());
        assert_eq!(paths.document, PathBuf::from("src/content/guides/t.md"));
        assert_eq!(paths.image, PathBuf::from("public/images/t.jpg"));
        assert_eq!(paths.image_file, "t.jpg");

        let stamped = DocumentWriter::new(WriterSettings::default());
        let paths = stamped.plan(Category::News, &slug, at());
        let millis = at().timestamp_millis();
        assert_eq!(paths.stem, format!("t-{}", millis));
        assert_eq!(
            paths.document,
            PathBuf::from(format!("src/content/news/t-{}.md", millis))
        );
    }

    #[test]
    fn test_collision_strategy_parse() {
        assert_eq!("overwrite".parse::<CollisionStrategy>().unwrap(), CollisionStrategy::Overwrite);
        assert_eq!("Timestamp".parse::<CollisionStrategy>().unwrap(), CollisionStrategy::Timestamp);
        assert!("append".parse::<CollisionStrategy>().is_err());
    }
}
