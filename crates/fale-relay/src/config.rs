//! Configuration loading and resolution.

use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::rewrite::ReplaceRule;

/// Default listen address for the HTTP server.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default upstream fetch timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default number of redirects followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Runtime settings shared by the server and the one-shot commands.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen_addr: SocketAddr,
    pub fetch_timeout_ms: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    pub rules: Vec<ReplaceRule>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fetch_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("fale-relay/{}", env!("CARGO_PKG_VERSION")),
            rules: ReplaceRule::defaults(),
        }
    }
}

/// Command-line flags that feed [`RelayConfig`].
///
/// Each flag falls back to its environment variable, then to the default.
#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Listen address (host:port).
    #[arg(long, global = true, env = "FALE_RELAY_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Upstream fetch timeout in milliseconds.
    #[arg(long, global = true, env = "FALE_RELAY_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Maximum redirects to follow when fetching.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,
}

impl ConfigArgs {
    /// Resolve the flags into a validated config.
    pub fn resolve(&self) -> Result<RelayConfig> {
        let listen_addr: SocketAddr = self
            .addr
            .parse()
            .with_context(|| format!("invalid listen address '{}'", self.addr))?;

        Ok(RelayConfig {
            listen_addr,
            fetch_timeout_ms: self.timeout_ms,
            max_redirects: self.max_redirects,
            ..RelayConfig::default()
        })
    }
}
