//! Email address validation and normalization

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Longest address we accept (RFC 5321 path limit minus the brackets).
pub const MAX_EMAIL_LEN: usize = 254;

/// `something.something` with no whitespace and no `@`.
static DOMAIN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+\.[^\s@]+$").expect("domain pattern is a valid regex")
});

/// Why a candidate address was rejected. Every variant is a user input
/// problem; none of them ever reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEmail {
    #[error("email address is empty")]
    Empty,

    #[error("email address is longer than 254 characters")]
    TooLong,

    #[error("email address contains whitespace")]
    Whitespace,

    #[error("email address has no '@'")]
    MissingAt,

    #[error("email address has more than one '@'")]
    MultipleAt,

    #[error("email address has an empty local part")]
    EmptyLocalPart,

    #[error("email domain must look like 'example.com'")]
    InvalidDomain,
}

/// A validated, normalized (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate `local@domain.tld`: no whitespace, exactly one `@`, and a
    /// domain containing a `.` with text on both sides.
    pub fn parse(raw: &str) -> Result<Self, InvalidEmail> {
        let candidate = raw.trim();
        if candidate.is_empty() {
            return Err(InvalidEmail::Empty);
        }
        if candidate.chars().count() > MAX_EMAIL_LEN {
            return Err(InvalidEmail::TooLong);
        }
        if candidate.chars().any(char::is_whitespace) {
            return Err(InvalidEmail::Whitespace);
        }

        let (local, domain) = match candidate.split_once('@') {
            None => return Err(InvalidEmail::MissingAt),
            Some((_, domain)) if domain.contains('@') => return Err(InvalidEmail::MultipleAt),
            Some(parts) => parts,
        };
        if local.is_empty() {
            return Err(InvalidEmail::EmptyLocalPart);
        }
        if !DOMAIN_SHAPE.is_match(domain) {
            return Err(InvalidEmail::InvalidDomain);
        }

        Ok(Self(candidate.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
