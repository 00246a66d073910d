use anyhow::{Result, anyhow};
use signup::{Provenance, SignupOutcome};

use super::open_signup_store;
use crate::config::SiteConfig;

/// Provenance recorded for signups entered from the command line.
pub fn cli_provenance() -> Provenance {
    Provenance::new(Some("cli"), Some(concat!("site/", env!("CARGO_PKG_VERSION"))))
}

#[allow(clippy::print_stdout)]
pub async fn signup_command(config: &SiteConfig, email: &str) -> Result<()> {
    let (site, store) = open_signup_store(config)?;

    match store.submit(&site, email, &cli_provenance()).await? {
        SignupOutcome::Accepted => {
            println!("Registered {} for {}", email.trim().to_lowercase(), site);
            Ok(())
        }
        SignupOutcome::AlreadyRegistered => {
            println!("Already registered for {}", site);
            Ok(())
        }
        SignupOutcome::Invalid(reason) => Err(anyhow!("'{}' rejected: {}", email, reason)),
    }
}
