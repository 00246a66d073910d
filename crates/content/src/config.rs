// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Content configuration — the `content:` section of `site.yaml`.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where content sources live.
///
/// ```yaml
/// content:
///   root: "./content"
///   directories:
///     article: "posts"
/// ```
///
/// Categories without an entry in `directories` use their default
/// directory (`blog`, `comparison`, `faq`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub directories: BTreeMap<Category, String>,
}

fn default_root() -> PathBuf {
    PathBuf::from("content")
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            directories: BTreeMap::new(),
        }
    }
}

impl ContentConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Source directory for a category.
    pub fn dir(&self, category: Category) -> PathBuf {
        let rel = self
            .directories
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.default_dir());
        self.root.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_content_config() {
        let yaml = r#"
root: "/srv/site/content"
directories:
  article: "posts"
"#;
        let config: ContentConfig = serde_yaml_ng::from_str(yaml).expect("parse config");
        assert_eq!(config.dir(Category::Article), PathBuf::from("/srv/site/content/posts"));
        assert_eq!(
            config.dir(Category::Comparison),
            PathBuf::from("/srv/site/content/comparison")
        );
    }

    #[test]
    fn default_config_uses_content_dir() {
        let config = ContentConfig::default();
        assert_eq!(config.dir(Category::Faq), PathBuf::from("content/faq"));
    }
}
