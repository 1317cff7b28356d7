//! ChainDrop CLI — inspect collections and plan batched airdrops.
//!
//! # Commands
//! ```text
//! chaindrop assets    --collection <pubkey> [--json]
//! chaindrop plan      --collection <pubkey> --recipients <file.json> [--chunk-size N]
//! chaindrop blockhash
//! chaindrop providers
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use chaindrop_core::LedgerClient;
use chaindrop_http::HttpRpcClient;
use chaindrop_rpc::RpcTransport;
use chaindrop_solana::providers::{self, public};
use chaindrop_solana::SolanaLedgerClient;

mod cmd_assets;
mod cmd_plan;
mod config;
mod logging;

use config::FileConfig;
use logging::LogConfig;

#[derive(Parser)]
#[command(
    name = "chaindrop",
    about = "Batched compressed-NFT airdrops — ChainDrop CLI",
    long_about = "
ChainDrop CLI: read a collection through the DAS API, work out which
recipients still need a mint, and probe the ledger.

ENVIRONMENT VARIABLES:
  RPC_URL    JSON-RPC endpoint (a DAS-capable provider for assets/plan)
",
    version
)]
struct Cli {
    /// JSON-RPC endpoint (default: public devnet)
    #[arg(long, global = true, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// JSON config file with `rpc_url`, `pipeline` and `log` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every asset in a collection
    Assets {
        /// Collection mint address
        #[arg(long)]
        collection: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter a recipient list against current holders and print the batches
    Plan {
        /// Collection mint address
        #[arg(long)]
        collection: String,
        /// JSON file: [{"address": "<pubkey>"}, ...]
        #[arg(long)]
        recipients: PathBuf,
        /// Recipients per transaction
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Fetch a fresh blockhash and its last valid block height
    Blockhash,

    /// List known RPC provider profiles
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    logging::init_tracing(&log_config(&cli, file.log.clone()));

    let rpc_url = cli
        .rpc_url
        .clone()
        .or(file.rpc_url.clone())
        .unwrap_or_else(|| public::DEVNET_URL.to_string());
    let mut pipeline = file.pipeline;

    match cli.command {
        Commands::Assets { collection, json } => {
            cmd_assets::run(transport(&rpc_url)?, &pipeline, &collection, json).await
        }

        Commands::Plan {
            collection,
            recipients,
            chunk_size,
        } => {
            if let Some(n) = chunk_size {
                pipeline.chunk_size = n;
            }
            cmd_plan::run(transport(&rpc_url)?, &pipeline, &collection, &recipients).await
        }

        Commands::Blockhash => cmd_blockhash(transport(&rpc_url)?).await,

        Commands::Providers => {
            cmd_providers();
            Ok(())
        }
    }
}

fn log_config(cli: &Cli, mut config: LogConfig) -> LogConfig {
    if let Some(level) = &cli.log_level {
        config.level = level.clone();
    }
    config.json |= cli.json_logs;
    config
}

fn transport(url: &str) -> Result<Arc<dyn RpcTransport>> {
    let client = HttpRpcClient::default_for(url).with_context(|| format!("building client for {url}"))?;
    Ok(Arc::new(client))
}

async fn cmd_blockhash(transport: Arc<dyn RpcTransport>) -> Result<()> {
    let url = transport.url().to_string();
    let ledger = SolanaLedgerClient::with_defaults(transport);
    let handle = ledger
        .recent_handle()
        .await
        .with_context(|| format!("fetching blockhash from {url}"))?;
    let height = ledger.block_height().await?;
    println!("Blockhash:              {}", handle.blockhash);
    println!("Last valid height:      {}", handle.last_valid_block_height);
    println!(
        "Current height:         {height} ({} blocks left)",
        handle.last_valid_block_height.saturating_sub(height)
    );
    Ok(())
}

fn cmd_providers() {
    println!("{:<8} {:<8} {:<4} URL", "NAME", "CLUSTER", "DAS");
    for p in providers::profiles() {
        let das = if p.das { "yes" } else { "no" };
        println!("{:<8} {:<8} {:<4} {}", p.name, p.cluster.to_string(), das, p.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_log_file_settings() {
        let cli = Cli::parse_from(["chaindrop", "--log-level", "debug", "--json-logs", "providers"]);
        let config = log_config(&cli, LogConfig::default());
        assert_eq!(config.level, "debug");
        assert!(config.json);
    }

    #[test]
    fn parses_plan_arguments() {
        let cli = Cli::parse_from([
            "chaindrop",
            "plan",
            "--collection",
            "COLL",
            "--recipients",
            "airdrop.json",
            "--chunk-size",
            "2",
        ]);
        match cli.command {
            Commands::Plan { chunk_size, recipients, .. } => {
                assert_eq!(chunk_size, Some(2));
                assert_eq!(recipients, PathBuf::from("airdrop.json"));
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn default_pipeline_is_valid() {
        assert!(chaindrop_core::PipelineConfig::default().validate().is_ok());
    }
}
