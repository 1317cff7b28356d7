//! `chaindrop assets` — list every asset of a collection.

use std::sync::Arc;

use anyhow::{Context, Result};
use chaindrop_core::{GroupQuery, Paginator, PipelineConfig};
use chaindrop_rpc::RpcTransport;
use chaindrop_solana::das::{metadata_update_items, DasAsset};
use chaindrop_solana::DasClient;

pub async fn fetch(
    transport: Arc<dyn RpcTransport>,
    config: &PipelineConfig,
    collection: &str,
) -> Result<Vec<DasAsset>> {
    Paginator::new(DasClient::new(transport))
        .page_size(config.page_size)
        .max_pages(config.max_pages)
        .fetch_all(&GroupQuery::collection(collection))
        .await
        .with_context(|| format!("fetching assets of collection {collection}"))
}

pub async fn run(
    transport: Arc<dyn RpcTransport>,
    config: &PipelineConfig,
    collection: &str,
    json: bool,
) -> Result<()> {
    let assets = fetch(transport, config, collection).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
        return Ok(());
    }

    let live = metadata_update_items(&assets).len();
    println!("Collection {collection}");
    println!("  Assets:  {}", assets.len());
    println!("  Live:    {live}");
    println!("  Burnt:   {}", assets.len() - live);
    for asset in &assets {
        let burnt = if asset.burnt { " [burnt]" } else { "" };
        println!("    {} → {}{}", asset.id, asset.owner(), burnt);
    }
    Ok(())
}
