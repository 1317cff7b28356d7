//! `chaindrop plan` — dry run of an airdrop: who still needs a mint, and how
//! the mints split into transactions.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chaindrop_core::{batch_count, plan, PipelineConfig, WorkItem};
use chaindrop_rpc::RpcTransport;
use chaindrop_solana::airdrop::{parse_recipients, pending_recipients};

use crate::cmd_assets;

pub async fn run(
    transport: Arc<dyn RpcTransport>,
    config: &PipelineConfig,
    collection: &str,
    recipients: &Path,
) -> Result<()> {
    let chunk_size = config.chunk_size()?;

    let raw = std::fs::read_to_string(recipients)
        .with_context(|| format!("reading recipients {}", recipients.display()))?;
    let entries = parse_recipients(&raw)
        .with_context(|| format!("parsing recipients {}", recipients.display()))?;

    let existing = cmd_assets::fetch(transport, config, collection).await?;
    let pending = pending_recipients(&entries, &existing);

    for address in &pending.invalid {
        tracing::warn!(%address, "skipping invalid recipient address");
    }

    println!("Recipients:     {}", entries.len());
    println!("  Already own:  {}", pending.already_owned);
    println!("  Duplicates:   {}", pending.duplicates);
    println!("  Invalid:      {}", pending.invalid.len());
    println!("  Pending:      {}", pending.items.len());
    print_batches(pending.items, chunk_size, config);
    Ok(())
}

/// Batch count and per-batch sizes for `items` at `chunk_size`.
fn plan_summary(items: &[WorkItem], chunk_size: NonZeroUsize) -> (usize, Vec<usize>) {
    let total = batch_count(items.len(), chunk_size.get());
    let sizes = items.chunks(chunk_size.get()).map(<[WorkItem]>::len).collect();
    (total, sizes)
}

fn print_batches(items: Vec<WorkItem>, chunk_size: NonZeroUsize, config: &PipelineConfig) {
    let (total, _) = plan_summary(&items, chunk_size);
    println!(
        "Batches:        {total} (chunk size {chunk_size}, {} in flight, fee {} µlamports/CU)",
        config.concurrency, config.priority_fee_micro_lamports
    );
    for batch in plan(items, chunk_size) {
        let targets: Vec<_> = batch.items().iter().map(WorkItem::target).collect();
        println!("  #{:<5} {}", batch.index(), targets.join(", "));
    }
}
