//! Command handlers for the CLI.
//!
//! Each handler builds a fresh client from the loaded configuration, runs
//! one operation, and prints the result as JSON. Failures propagate to
//! `main` and exit non-zero.

use ysync_client::{ProductInput, YotpoClient, YotpoConfig};
use ysync_core::AppConfig;

fn build_client(config: &AppConfig) -> anyhow::Result<YotpoClient> {
    let client_config = YotpoConfig {
        api_key: config.api_key.clone(),
        api_secret: config.api_secret.clone(),
        additional_headers: config.additional_headers.clone(),
        timeout_secs: config.request_timeout_secs,
        reviews_cache_ttl_secs: config.reviews_cache_ttl_secs,
        store_base_url: config.store_base_url.clone(),
        reviews_base_url: config.reviews_base_url.clone(),
    };
    Ok(YotpoClient::new(&client_config)?)
}

pub(crate) async fn products(config: &AppConfig, refresh: bool) -> anyhow::Result<()> {
    let mut client = build_client(config)?;
    let index = client.products(refresh).await?;
    tracing::info!(count = index.len(), refresh, "fetched product index");
    println!("{}", serde_json::to_string_pretty(&index)?);
    Ok(())
}

pub(crate) async fn upsert(
    config: &AppConfig,
    input: &ProductInput,
    update: bool,
) -> anyhow::Result<()> {
    let mut client = build_client(config)?;
    let wrote = client.upsert_product(input, update).await?;
    if wrote {
        println!("product '{}' written to Yotpo", input.external_id);
    } else {
        println!(
            "product '{}' already exists; pass --update to patch it",
            input.external_id
        );
    }
    Ok(())
}

pub(crate) async fn reviews(config: &AppConfig) -> anyhow::Result<()> {
    let mut client = build_client(config)?;
    let index = client.bottom_lines().await?;
    tracing::info!(count = index.len(), "fetched review bottom lines");
    println!("{}", serde_json::to_string_pretty(&index)?);
    Ok(())
}
