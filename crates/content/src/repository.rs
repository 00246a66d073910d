// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Content repository — discovers, loads and renders content sources.
//!
//! Every public operation is infallible from the caller's point of view:
//! a broken source is logged and left out, a missing directory lists as
//! empty. Nothing here should be the reason a page fails to render.

use crate::category::Category;
use crate::config::ContentConfig;
use crate::frontmatter::{Frontmatter, split_frontmatter};
use crate::item::{ContentItem, PublishedAt};
use crate::listing::Listing;
use crate::markdown::render_markdown;
use futures::future::join_all;
use std::io::ErrorKind;
use std::path::PathBuf;

const SOURCE_EXTENSION: &str = ".md";

/// Why a single source could not be turned into an item.
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("slug is not URL-safe")]
    InvalidSlug,

    #[error("no such source")]
    NotFound,

    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("source is not UTF-8")]
    Encoding,

    #[error("bad frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml_ng::Error),
}

/// A slug is the source file stem: ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Read-only view over the content directories. Cheap to clone and safe to
/// share across concurrent requests.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    config: ContentConfig,
}

impl ContentRepository {
    pub fn new(config: ContentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    fn source_path(&self, category: Category, slug: &str) -> PathBuf {
        self.config
            .dir(category)
            .join(format!("{}{}", slug, SOURCE_EXTENSION))
    }

    /// All slugs in a category, sorted by name.
    pub async fn list_slugs(&self, category: Category) -> Listing<String> {
        let dir = self.config.dir(category);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                diagnostics::debug!(
                    "No content directory for {category} at {dir}",
                    category: category.as_str(),
                    dir: dir.display().to_string()
                );
                return Listing::missing();
            }
            Err(e) => {
                diagnostics::warn!(
                    "Cannot read content directory {dir}: {reason}",
                    dir: dir.display().to_string(),
                    reason: e.to_string()
                );
                return Listing::unreadable(e.to_string());
            }
        };

        let mut slugs = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    diagnostics::warn!(
                        "Stopped scanning {dir}: {reason}",
                        dir: dir.display().to_string(),
                        reason: e.to_string()
                    );
                    break;
                }
            };

            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file() || t.is_symlink())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(SOURCE_EXTENSION) else {
                continue;
            };
            if is_valid_slug(stem) {
                slugs.push(stem.to_string());
            } else {
                diagnostics::debug!("Skipping non-URL-safe source {name}", name: name);
            }
        }

        slugs.sort();
        Listing::available(slugs)
    }

    /// Load one item. `None` means "not found" to the caller, whatever the cause.
    pub async fn get_item(&self, category: Category, slug: &str) -> Option<ContentItem> {
        match self.load(category, slug).await {
            Ok(item) => Some(item),
            Err(LoadError::NotFound) | Err(LoadError::InvalidSlug) => {
                diagnostics::debug!(
                    "No {category} item for slug {slug}",
                    category: category.as_str(),
                    slug: slug
                );
                None
            }
            Err(e) => {
                diagnostics::warn!(
                    "Skipping {category}/{slug}: {reason}",
                    category: category.as_str(),
                    slug: slug,
                    reason: e.to_string()
                );
                None
            }
        }
    }

    /// All loadable items in a category, newest first. Items with equal
    /// dates keep their discovery (name) order; undated items come last.
    pub async fn list_items(&self, category: Category) -> Listing<ContentItem> {
        let slugs = self.list_slugs(category).await;

        let loaded = join_all(slugs.iter().map(|slug| self.get_item(category, slug))).await;
        let mut items: Vec<ContentItem> = loaded.into_iter().flatten().collect();
        items.sort_by(|a, b| PublishedAt::newest_first(&a.published_at, &b.published_at));

        diagnostics::debug!(
            "Listed {count} {category} items",
            count: items.len(),
            category: category.as_str()
        );
        slugs.with_entries(items)
    }

    async fn load(&self, category: Category, slug: &str) -> Result<ContentItem, LoadError> {
        if !is_valid_slug(slug) {
            return Err(LoadError::InvalidSlug);
        }

        let path = self.source_path(category, slug);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let raw = String::from_utf8(bytes).map_err(|_| LoadError::Encoding)?;

        let (fm_yaml, body) = split_frontmatter(&raw);
        let fm = Frontmatter::parse(&fm_yaml)?;

        let published_at = match fm.date.as_deref() {
            Some(date) => PublishedAt::parse(date).unwrap_or_else(|| {
                diagnostics::warn!(
                    "Unparseable date '{date}' in {category}/{slug}, treating as undated",
                    date: date,
                    category: category.as_str(),
                    slug: slug
                );
                PublishedAt::Undated
            }),
            None => PublishedAt::Undated,
        };

        Ok(ContentItem {
            slug: slug.to_string(),
            category,
            title: fm.title.unwrap_or_default(),
            description: fm.description.unwrap_or_default(),
            published_at,
            body_html: render_markdown(&body),
            target_keywords: fm.target_keywords.unwrap_or_default(),
            idea_name: fm.idea_name,
            status: fm.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("heart-rate-zones"));
        assert!(is_valid_slug("faq_01"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../secrets"));
        assert!(!is_valid_slug("a b"));
        assert!(!is_valid_slug("post.md"));
    }
}
