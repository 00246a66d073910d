use anyhow::{Result, anyhow};
use content::{Category, ContentRepository};

use crate::config::SiteConfig;

#[allow(clippy::print_stdout)]
pub async fn show_command(config: &SiteConfig, category: Category, slug: &str) -> Result<()> {
    let repo = ContentRepository::new(config.content.clone());
    let item = repo
        .get_item(category, slug)
        .await
        .ok_or_else(|| anyhow!("No {} named '{}'", category, slug))?;

    println!("# {}", item.title);
    if let Some(date) = item.published_at.raw() {
        println!("date: {date}");
    }
    if !item.description.is_empty() {
        println!("description: {}", item.description);
    }
    println!();
    print!("{}", item.body_html);
    Ok(())
}
