//! Serve command - run the HTTP endpoint

use std::net::SocketAddr;
use ticket2pr::config::AppConfig;
use ticket2pr::error::Result;
use ticket2pr::server::start_server;

/// Serve until Ctrl+C, optionally overriding the configured address
pub async fn run_serve(addr: Option<SocketAddr>) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(addr) = addr {
        config.listen_addr = addr;
    }
    start_server(&config).await
}
