use anyhow::Result;
use ::signup::{EmailAddress, SignupRecord};

use super::open_signup_store;
use crate::config::SiteConfig;

pub fn format_signup(email: &str, record: Option<&SignupRecord>) -> String {
    match record {
        Some(r) => {
            let at = r
                .signed_up_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string());
            format!("{email}\t{at}\t{}\t{}", r.origin_ip, r.user_agent)
        }
        None => format!("{email}\t-\t-\t-"),
    }
}

#[allow(clippy::print_stdout)]
pub async fn signups_command(config: &SiteConfig) -> Result<()> {
    let (site, store) = open_signup_store(config)?;

    for email in store.signups(&site).await? {
        // Entries predating validation may not parse; list them bare.
        let record = match EmailAddress::parse(&email) {
            Ok(parsed) => store.record(&site, &parsed).await?,
            Err(_) => None,
        };
        println!("{}", format_signup(&email, record.as_ref()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_record() {
        assert_eq!(format_signup("a@b.com", None), "a@b.com\t-\t-\t-");
    }

    #[test]
    fn test_format_with_record() {
        let record = SignupRecord {
            email: "a@b.com".to_string(),
            site_id: "x".to_string(),
            signed_up_at: None,
            origin_ip: "cli".to_string(),
            user_agent: "site/0.1.0".to_string(),
        };
        assert_eq!(
            format_signup("a@b.com", Some(&record)),
            "a@b.com\t-\tcli\tsite/0.1.0"
        );
    }
}
