use crate::backend::SignupBackend;
use crate::error::ConfigError;
use crate::memory::MemoryBackend;
use crate::redis_rest::RedisRestBackend;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const URL_ENV: &str = "UPSTASH_REDIS_REST_URL";
pub const TOKEN_ENV: &str = "UPSTASH_REDIS_REST_TOKEN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Memory,
    RedisRest,
}

/// The `signups:` section of the site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupConfig {
    pub backend: BackendKind,
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            url: None,
            token: None,
            timeout_ms: 5000,
        }
    }
}

impl SignupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Fill `url`/`token` from the environment when set, selecting the
    /// REST backend if a URL arrives that way.
    pub fn apply_env(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.url = Some(url);
            self.backend = BackendKind::RedisRest;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
    }

    /// Whether signups outlive the process that opened the store.
    pub fn is_persistent(&self) -> bool {
        self.backend != BackendKind::Memory
    }

    pub fn open(&self) -> Result<Arc<dyn SignupBackend>, ConfigError> {
        match self.backend {
            BackendKind::Memory => Ok(Arc::new(MemoryBackend::new())),
            BackendKind::RedisRest => {
                let url = self.url.as_deref().ok_or(ConfigError::MissingUrl)?;
                let token = self.token.as_deref().ok_or(ConfigError::MissingToken)?;
                Ok(Arc::new(RedisRestBackend::new(url, token, self.timeout())?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_memory() {
        let config = SignupConfig::default();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.open().is_ok());
        assert!(!config.is_persistent());
    }

    #[test]
    fn test_redis_rest_requires_credentials() {
        let mut config = SignupConfig {
            backend: BackendKind::RedisRest,
            ..Default::default()
        };
        assert!(matches!(config.open(), Err(ConfigError::MissingUrl)));
        config.url = Some("https://example.upstash.io".to_string());
        assert!(matches!(config.open(), Err(ConfigError::MissingToken)));
        config.token = Some("secret".to_string());
        assert!(config.open().is_ok());
    }

    #[test]
    fn test_env_selects_rest_backend() {
        let mut config = SignupConfig::default();
        config.apply_env(None, Some("t".to_string()));
        assert_eq!(config.backend, BackendKind::Memory);
        config.apply_env(Some("https://x.example".to_string()), None);
        assert_eq!(config.backend, BackendKind::RedisRest);
        assert_eq!(config.token.as_deref(), Some("t"));
    }
}
