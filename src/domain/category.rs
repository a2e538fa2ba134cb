//! Content categories and their site-facing names.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Content category (one Astro collection each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Short news pieces
    News,

    /// Road tests
    Tests,

    /// How-to guides
    Guides,
}

/// One row of the category table
struct CategoryInfo {
    key: &'static str,
    dir: &'static str,
    label: &'static str,
}

const NEWS: CategoryInfo = CategoryInfo {
    key: "news",
    dir: "news",
    label: "News",
};

// Reserved row: the label is fixed by the site layout, not derived from the key.
const TESTS: CategoryInfo = CategoryInfo {
    key: "tests",
    dir: "tests",
    label: "Tests",
};

const GUIDES: CategoryInfo = CategoryInfo {
    key: "guides",
    dir: "guides",
    label: "Guides",
};

impl Category {
    /// All categories, in site navigation order
    pub const ALL: [Category; 3] = [Category::News, Category::Tests, Category::Guides];

    fn info(self) -> &'static CategoryInfo {
        match self {
            Category::News => &NEWS,
            Category::Tests => &TESTS,
            Category::Guides => &GUIDES,
        }
    }

    /// Lowercase key used on the command line and in env vars
    pub fn key(self) -> &'static str {
        self.info().key
    }

    /// Directory under the content root holding this collection
    pub fn dir_name(self) -> &'static str {
        self.info().dir
    }

    /// Label written into the `categories` front-matter array
    pub fn display_label(self) -> &'static str {
        self.info().label
    }

    /// Parse a category, falling back to `News` for unknown input.
    ///
    /// A typo in the `CATEGORY` variable should still produce an article,
    /// so this never fails.
    pub fn parse_lenient(input: &str) -> Self {
        match input.parse() {
            Ok(category) => category,
            Err(_) => {
                warn!(category = %input, "Unknown category, falling back to news");
                Category::News
            }
        }
    }

    /// Find the category owning a content directory name
    pub fn from_dir_name(dir: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == dir)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::News
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.key())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("news".parse::<Category>().unwrap(), Category::News);
        assert_eq!(" Tests ".parse::<Category>().unwrap(), Category::Tests);
        assert_eq!("GUIDES".parse::<Category>().unwrap(), Category::Guides);
        assert!("reviews".parse::<Category>().is_err());
    }

    #[test]
    fn test_lenient_parse_falls_back_to_news() {
        assert_eq!(Category::parse_lenient("nwes"), Category::News);
        assert_eq!(Category::parse_lenient(""), Category::News);
        assert_eq!(Category::parse_lenient("guides"), Category::Guides);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Category::News.display_label(), "News");
        assert_eq!(Category::Tests.display_label(), "Tests");
        assert_eq!(Category::Guides.display_label(), "Guides");
    }

    #[test]
    fn test_dir_name_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_dir_name(category.dir_name()), Some(category));
        }
        assert_eq!(Category::from_dir_name("images"), None);
    }
}
