// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Content — articles, comparisons and FAQs for the site
//!
//! Sources are markdown files with a YAML frontmatter block, one directory
//! per category. The repository lists them, parses them, renders the body
//! with pulldown-cmark, and hands back immutable [`ContentItem`]s.
//!
//! ```no_run
//! # async fn demo() {
//! use content::{Category, ContentConfig, ContentRepository};
//!
//! let repo = ContentRepository::new(ContentConfig::with_root("./content"));
//! for item in repo.list_items(Category::Article).await {
//!     let _ = (item.slug, item.title);
//! }
//! # }
//! ```

mod category;
mod config;
mod frontmatter;
mod item;
mod listing;
pub mod markdown;
mod repository;

pub use category::{Category, UnknownCategory};
pub use config::ContentConfig;
pub use item::{ContentItem, PublishedAt};
pub use listing::{Listing, SourceStatus};
pub use repository::{ContentRepository, is_valid_slug};
