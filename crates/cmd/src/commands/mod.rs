pub mod count;
pub mod list;
pub mod serve;
pub mod show;
pub mod signup;
pub mod signups;

pub use count::count_command;
pub use list::list_command;
pub use serve::serve_command;
pub use show::show_command;
pub use signup::signup_command;
pub use signups::signups_command;

use anyhow::{Result, bail};
use ::signup::{SignupStore, SiteId, URL_ENV};

use crate::config::SiteConfig;

/// Open the configured signup store for a one-shot command. The memory
/// backend is refused: it would start empty and vanish on exit.
pub fn open_signup_store(config: &SiteConfig) -> Result<(SiteId, SignupStore)> {
    if !config.signups.is_persistent() {
        bail!(
            "signups.backend is memory, which keeps nothing between runs; \
             set signups.backend: redis_rest or {URL_ENV}"
        );
    }
    let site = config.site_id()?;
    Ok((site, SignupStore::new(config.signups.open()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::signup::BackendKind;

    #[test]
    fn test_memory_backend_is_refused() {
        let config = SiteConfig::default();
        let err = open_signup_store(&config).err().expect("memory refused");
        assert!(err.to_string().contains(URL_ENV), "got: {err}");
    }

    #[test]
    fn test_rest_backend_opens() {
        let mut config = SiteConfig::default();
        config.signups.backend = BackendKind::RedisRest;
        config.signups.url = Some("https://example.upstash.io".to_string());
        config.signups.token = Some("token".to_string());

        let (site, _store) = open_signup_store(&config).expect("opens");
        assert_eq!(site.as_str(), "cardioguard");
    }

    #[tokio::test]
    async fn test_commands_refuse_memory_backend() {
        let config = SiteConfig::default();
        assert!(signup_command(&config, "a@b.com").await.is_err());
        assert!(count_command(&config).await.is_err());
        assert!(signups_command(&config).await.is_err());
    }
}
