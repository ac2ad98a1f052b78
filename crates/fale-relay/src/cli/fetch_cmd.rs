//! One-shot fetch and rewrite of a single URL.

use anyhow::{Context, Result};

use crate::config::ConfigArgs;
use crate::relay::{FetchRequest, Relay};

pub async fn run(url: &str, json: bool, args: &ConfigArgs) -> Result<()> {
    let config = args.resolve()?;
    let relay = Relay::new(&config)?;
    let response = relay
        .handle(FetchRequest {
            url: Some(url.to_string()),
        })
        .await
        .with_context(|| format!("relay failed for {url}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.content);
    }
    Ok(())
}
