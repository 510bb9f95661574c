//! Remote filter against a live Redis server
//!
//! ```text
//! BLOOM_REDIS_URL=redis://127.0.0.1:6379 RUST_LOG=debug \
//!     cargo run -p chain-bloom --example remote_filter
//! ```
//!
//! Pass `--memory` to run against the in-process store instead.

use anyhow::Context;
use chain_bloom::{
    BloomConfig, BloomFilterApi, InMemoryScriptStore, LocalFilterRegistry, Metrics, RedisConfig,
    RedisScriptClient, RemoteBloomFilter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const KEY: &str = "demo:seen-urls";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BloomConfig::for_capacity(10_000, 0.01)?;
    info!(m = config.size_bits, k = config.hash_rounds, "Filter parameters");

    let metrics = Arc::new(Metrics::new());
    let remote: Box<dyn BloomFilterApi> = if std::env::args().any(|a| a == "--memory") {
        let store = Arc::new(InMemoryScriptStore::new());
        Box::new(RemoteBloomFilter::new(config, store)?.with_metrics(metrics.clone()))
    } else {
        let redis = RedisConfig::from_env();
        info!(url = %redis.url, "Connecting to Redis");
        let client = Arc::new(RedisScriptClient::connect(&redis)?);
        Box::new(RemoteBloomFilter::new(config, client)?.with_metrics(metrics.clone()))
    };
    let local = LocalFilterRegistry::new(config)?;

    let urls: Vec<String> = (0..100)
        .map(|i| format!("https://example.com/page/{}", i))
        .collect();

    for url in &urls {
        remote.set(KEY, url).await.context("remote set")?;
        local.set(KEY, url).await?;
    }

    for url in &urls {
        anyhow::ensure!(remote.exist(KEY, url).await?, "remote lost {}", url);
        anyhow::ensure!(local.exist(KEY, url).await?, "local lost {}", url);
    }

    let unseen = remote.exist(KEY, "https://example.org/never-added").await?;
    info!(unseen, "Probe for an element that was never added");

    let snapshot = metrics.snapshot();
    info!(
        inserted = snapshot.elements_inserted,
        lookups = snapshot.lookups_performed,
        avg_insert_ns = snapshot.avg_insert_ns,
        avg_lookup_ns = snapshot.avg_lookup_ns,
        "Done"
    );
    Ok(())
}
