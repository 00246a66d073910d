// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Site configuration, parsed from `site.yaml`.

use content::ContentConfig;
use serde::{Deserialize, Serialize};
use signup::{SignupConfig, SiteId, TOKEN_ENV, URL_ENV};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "site.yaml";
pub const SITE_ID_ENV: &str = "SITE_ID";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error(transparent)]
    Signups(#[from] signup::ConfigError),
}

/// Top-level site configuration. Every section is optional.
///
/// ```yaml
/// site:
///   id: "cardioguard"
///
/// content:
///   root: "./content"
///
/// signups:
///   backend: redis_rest
///   url: "https://example.upstash.io"
///   token: "..."
///   timeout_ms: 5000
///
/// server:
///   listen: "127.0.0.1:3000"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteMeta,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub signups: SignupConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMeta {
    #[serde(default = "default_site_id")]
    pub id: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            id: default_site_id(),
        }
    }
}

fn default_site_id() -> String {
    "cardioguard".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

impl SiteConfig {
    /// Load from `path`, or from `site.yaml` in the working directory if it
    /// exists, or fall back to defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a config file. A relative content root is resolved against the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: SiteConfig =
            serde_yaml_ng::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.content.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.content.root = dir.join(&config.content.root);
            }
        }
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(SITE_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.site.id = id;
        }
        self.signups.apply_env(lookup(URL_ENV), lookup(TOKEN_ENV));
    }

    pub fn site_id(&self) -> Result<SiteId, ConfigError> {
        Ok(SiteId::new(&self.site.id)?)
    }
}
