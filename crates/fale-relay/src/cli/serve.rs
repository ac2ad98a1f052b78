//! Start the relay's HTTP server.

use anyhow::Result;
use tracing::info;

use crate::config::ConfigArgs;
use crate::rest;

pub async fn run(args: &ConfigArgs) -> Result<()> {
    let config = args.resolve()?;
    info!(
        "starting fale-relay v{} (timeout {} ms, {} redirects)",
        env!("CARGO_PKG_VERSION"),
        config.fetch_timeout_ms,
        config.max_redirects
    );
    rest::start(&config).await
}
