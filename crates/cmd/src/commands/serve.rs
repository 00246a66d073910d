use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::server::{self, AppState};

pub async fn serve_command(config: &SiteConfig, listen: Option<SocketAddr>) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    server::run(state, listen.unwrap_or(config.server.listen)).await
}
