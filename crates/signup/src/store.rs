use crate::backend::SignupBackend;
use crate::email::{EmailAddress, InvalidEmail};
use crate::error::Result;
use crate::keys::SiteId;
use crate::memory::MemoryBackend;
use chrono::{DateTime, SecondsFormat, Utc};
use diagnostics::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Stand-in for provenance the transport could not supply.
pub const UNKNOWN: &str = "unknown";

/// Where a signup came from. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub ip: String,
    pub user_agent: String,
}

impl Provenance {
    pub fn new(ip: Option<&str>, user_agent: Option<&str>) -> Self {
        let or_unknown = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };
        Self {
            ip: or_unknown(ip),
            user_agent: or_unknown(user_agent),
        }
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Result of registering an already-validated address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Accepted,
    AlreadyRegistered,
}

/// Result of a raw signup submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Accepted,
    AlreadyRegistered,
    Invalid(InvalidEmail),
}

impl From<Registration> for SignupOutcome {
    fn from(r: Registration) -> Self {
        match r {
            Registration::Accepted => SignupOutcome::Accepted,
            Registration::AlreadyRegistered => SignupOutcome::AlreadyRegistered,
        }
    }
}

/// Metadata stored alongside each accepted signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRecord {
    pub email: String,
    pub site_id: String,
    pub signed_up_at: Option<DateTime<Utc>>,
    pub origin_ip: String,
    pub user_agent: String,
}

impl SignupRecord {
    fn from_fields(site: &SiteId, email: &EmailAddress, mut fields: BTreeMap<String, String>) -> Self {
        let signed_up_at = fields
            .get("timestamp")
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));
        Self {
            email: fields
                .remove("email")
                .unwrap_or_else(|| email.as_str().to_string()),
            site_id: site.as_str().to_string(),
            signed_up_at,
            origin_ip: fields.remove("ip").unwrap_or_else(|| UNKNOWN.to_string()),
            user_agent: fields
                .remove("userAgent")
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// Per-site signup list with duplicate suppression.
///
/// An address moves from unregistered to registered exactly once per site;
/// there is no removal.
#[derive(Clone)]
pub struct SignupStore {
    backend: Arc<dyn SignupBackend>,
}

impl SignupStore {
    pub fn new(backend: Arc<dyn SignupBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub async fn is_registered(&self, site: &SiteId, email: &EmailAddress) -> Result<bool> {
        self.backend
            .contains(&site.list_key(), email.as_str())
            .await
    }

    /// Add `email` to the site's list if absent, then bump the counter and
    /// write the metadata record. Duplicates cause no writes.
    pub async fn register(
        &self,
        site: &SiteId,
        email: &EmailAddress,
        provenance: &Provenance,
    ) -> Result<Registration> {
        let appended = self
            .backend
            .append_if_absent(&site.list_key(), email.as_str())
            .await?;
        if !appended {
            debug!("Duplicate signup for {site}", site: site.as_str());
            return Ok(Registration::AlreadyRegistered);
        }

        // The list entry is the record of truth from here on. A failure
        // below leaves the counter short of the list length.
        let count = self.backend.increment(&site.counter_key()).await?;

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.backend
            .put_record(
                &site.record_key(email),
                &[
                    ("email", email.as_str()),
                    ("timestamp", timestamp.as_str()),
                    ("ip", provenance.ip.as_str()),
                    ("userAgent", provenance.user_agent.as_str()),
                ],
            )
            .await?;

        info!("Accepted signup for {site}, count now {count}", site: site.as_str(), count: count);
        Ok(Registration::Accepted)
    }

    /// Validate `raw` and register it. Invalid input never reaches the
    /// backend.
    pub async fn submit(
        &self,
        site: &SiteId,
        raw: &str,
        provenance: &Provenance,
    ) -> Result<SignupOutcome> {
        let email = match EmailAddress::parse(raw) {
            Ok(email) => email,
            Err(reason) => return Ok(SignupOutcome::Invalid(reason)),
        };
        Ok(self.register(site, &email, provenance).await?.into())
    }

    pub async fn try_count(&self, site: &SiteId) -> Result<u64> {
        let value = self.backend.get_counter(&site.counter_key()).await?;
        Ok(value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0))
    }

    /// Signup counter for display. Store failures degrade to 0.
    pub async fn count(&self, site: &SiteId) -> u64 {
        match self.try_count(site).await {
            Ok(n) => n,
            Err(e) => {
                let reason = e.to_string();
                warn!("Signup count unavailable for {site}: {reason}", site: site.as_str(), reason: reason);
                0
            }
        }
    }

    /// Every registered address in signup order.
    pub async fn signups(&self, site: &SiteId) -> Result<Vec<String>> {
        self.backend.members(&site.list_key()).await
    }

    pub async fn record(
        &self,
        site: &SiteId,
        email: &EmailAddress,
    ) -> Result<Option<SignupRecord>> {
        let fields = self.backend.get_record(&site.record_key(email)).await?;
        Ok(fields.map(|f| SignupRecord::from_fields(site, email, f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_defaults() {
        let p = Provenance::new(Some(" 10.0.0.1 "), Some(""));
        assert_eq!(p.ip, "10.0.0.1");
        assert_eq!(p.user_agent, UNKNOWN);
        assert_eq!(Provenance::default().ip, UNKNOWN);
    }

    #[test]
    fn test_record_from_fields() {
        let email = EmailAddress::parse("a@b.com").expect("email");
        let mut fields = BTreeMap::new();
        fields.insert("timestamp".to_string(), "2024-05-01T10:00:00.000Z".to_string());
        fields.insert("userAgent".to_string(), "curl/8".to_string());

        let site = SiteId::new("x").expect("site");
        let record = SignupRecord::from_fields(&site, &email, fields);
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.site_id, "x");
        assert_eq!(record.origin_ip, UNKNOWN);
        assert_eq!(record.user_agent, "curl/8");
        assert_eq!(
            record.signed_up_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T10:00:00+00:00".to_string())
        );
    }
}
