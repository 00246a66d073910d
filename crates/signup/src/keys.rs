//! Storage key layout
//!
//! Every key is namespaced by the site id so several deployments can share
//! one backing store:
//!
//! - `email_signups:{site}` - known-emails list, append-only
//! - `email_signups_count:{site}` - signup counter
//! - `email_signup_meta:{site}:{email}` - per-signup metadata hash

use crate::email::EmailAddress;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Identifies which deployment owns a signup list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteId(String);

impl SiteId {
    pub fn new(id: &str) -> Result<Self, ConfigError> {
        let id = id.trim();
        let ok = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if ok {
            Ok(Self(id.to_string()))
        } else {
            Err(ConfigError::InvalidSiteId(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn list_key(&self) -> String {
        format!("email_signups:{}", self.0)
    }

    pub fn counter_key(&self) -> String {
        format!("email_signups_count:{}", self.0)
    }

    pub fn record_key(&self, email: &EmailAddress) -> String {
        format!("email_signup_meta:{}:{}", self.0, email)
    }
}

impl FromStr for SiteId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let site = SiteId::new("cardioguard").expect("site");
        let email = EmailAddress::parse("a@b.com").expect("email");
        assert_eq!(site.list_key(), "email_signups:cardioguard");
        assert_eq!(site.counter_key(), "email_signups_count:cardioguard");
        assert_eq!(site.record_key(&email), "email_signup_meta:cardioguard:a@b.com");
    }

    #[test]
    fn test_site_id_rejects_separators() {
        assert!(SiteId::new("").is_err());
        assert!(SiteId::new("a:b").is_err());
        assert!(SiteId::new("has space").is_err());
        assert!("prod-eu_1.v2".parse::<SiteId>().is_ok());
    }
}
