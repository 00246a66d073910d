use std::time::Duration;
use thiserror::Error;

/// Infrastructure failures talking to the signup backend. Validation and
/// duplicate outcomes are never reported through this type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("signup store unavailable: {0}")]
    Unavailable(String),

    #[error("signup store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("unexpected reply from signup store: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Problems building a backend from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("site id '{0}' must be non-empty and use only letters, digits, '-', '_' or '.'")]
    InvalidSiteId(String),

    #[error("redis_rest backend needs a url (signups.url or UPSTASH_REDIS_REST_URL)")]
    MissingUrl,

    #[error("redis_rest backend needs a token (signups.token or UPSTASH_REDIS_REST_TOKEN)")]
    MissingToken,

    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
