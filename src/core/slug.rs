//! Title to URL slug conversion.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Prefix for slugs generated when a title has nothing usable in it
const FALLBACK_PREFIX: &str = "articolo";

/// Normalize a title into a URL-safe identifier.
///
/// Lowercases, decomposes (NFD) and drops combining marks so accented
/// letters keep their base letter, then collapses every run of characters
/// outside `[a-z0-9]` into a single hyphen. Apostrophes count as separators
/// ("dell'auto" -> "dell-auto"). May return an empty string.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.to_lowercase().nfd().filter(|c| !is_combining_mark(*c)) {
        match ch {
            'a'..='z' | '0'..='9' => {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                out.push(ch);
                pending_dash = false;
            }
            // Apostrophes included
            _ => pending_dash = true,
        }
    }

    out
}

/// Slug of a generated article; never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Derive the slug from an article title.
    ///
    /// Titles with no letters or digits get `articolo-<8 hex chars>` so the
    /// document never ends up as `.md`.
    pub fn from_title(title: &str) -> Self {
        let slug = slugify(title);
        if slug.is_empty() {
            let id = Uuid::new_v4().simple().to_string();
            Self(format!("{}-{}", FALLBACK_PREFIX, &id[..8]))
        } else {
            Self(slug)
        }
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File stem for this slug, optionally suffixed (`<slug>-<suffix>`)
    pub fn stem(&self, suffix: Option<&str>) -> String {
        match suffix {
            Some(suffix) => format!("{}-{}", self.0, suffix),
            None => self.0.clone(),
        }
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
