use anyhow::Result;

use super::open_signup_store;
use crate::config::SiteConfig;

/// Prints the fallible count so an unreachable store is reported rather
/// than shown as zero.
#[allow(clippy::print_stdout)]
pub async fn count_command(config: &SiteConfig) -> Result<()> {
    let (site, store) = open_signup_store(config)?;
    println!("{}", store.try_count(&site).await?);
    Ok(())
}
