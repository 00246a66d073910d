// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Content categories — the fixed set of document kinds the site publishes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A kind of content document. Each category has its own source directory
/// and its own URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Article,
    Comparison,
    Faq,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Article, Category::Comparison, Category::Faq];

    /// Directory (relative to the content root) holding this category's sources.
    pub fn default_dir(self) -> &'static str {
        match self {
            Category::Article => "blog",
            Category::Comparison => "comparison",
            Category::Faq => "faq",
        }
    }

    /// First path segment of the list and detail URLs.
    pub fn url_segment(self) -> &'static str {
        match self {
            Category::Article => "blog",
            Category::Comparison => "compare",
            Category::Faq => "faq",
        }
    }

    /// Reverse of [`Category::url_segment`].
    pub fn from_url_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.url_segment() == segment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Article => "article",
            Category::Comparison => "comparison",
            Category::Faq => "faq",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown content category '{0}' (expected article, comparison or faq)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the category name or its URL segment (`blog`, `compare`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "article" | "blog" | "blog-post" => Ok(Category::Article),
            "comparison" | "compare" => Ok(Category::Comparison),
            "faq" => Ok(Category::Faq),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("article".parse::<Category>().ok(), Some(Category::Article));
        assert_eq!("blog".parse::<Category>().ok(), Some(Category::Article));
        assert_eq!("Compare".parse::<Category>().ok(), Some(Category::Comparison));
        assert_eq!("faq".parse::<Category>().ok(), Some(Category::Faq));
        assert!("news".parse::<Category>().is_err());
    }

    #[test]
    fn test_url_segment_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_url_segment(category.url_segment()), Some(category));
        }
        assert_eq!(Category::from_url_segment("comparison"), None);
    }
}
