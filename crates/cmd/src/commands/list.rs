use anyhow::Result;
use content::{Category, ContentItem, ContentRepository, SourceStatus};
use diagnostics::*;

use crate::config::SiteConfig;

/// One line per item: date (or `undated`), slug, title.
pub fn format_items(items: &[ContentItem]) -> String {
    let mut out = String::new();
    for item in items {
        let date = item.published_at.raw().unwrap_or("undated");
        out.push_str(&format!("{:<12} {:<32} {}\n", date, item.slug, item.title));
    }
    out
}

#[allow(clippy::print_stdout)]
pub async fn list_command(config: &SiteConfig, category: Category) -> Result<()> {
    let repo = ContentRepository::new(config.content.clone());
    let items = repo.list_items(category).await;

    match items.source() {
        SourceStatus::Available => {}
        SourceStatus::Missing => {
            let dir = config.content.dir(category).display().to_string();
            warn!("No {dir} directory; nothing to list", dir: dir);
        }
        SourceStatus::Unreadable(reason) => {
            let reason = reason.clone();
            warn!("Content directory unreadable: {reason}", reason: reason);
        }
    }

    print!("{}", format_items(&items));
    Ok(())
}
