//! chaindrop-solana — Solana implementations of the ChainDrop capabilities.
//!
//! - [`SolanaLedgerClient`] — `getLatestBlockhash` / `sendTransaction` /
//!   `getSignatureStatuses` behind the [`LedgerClient`](chaindrop_core::LedgerClient) trait
//! - [`DasClient`] — DAS `getAssetsByGroup` behind [`IndexingService`](chaindrop_core::IndexingService)
//! - [`airdrop`] — recipient list parsing and prior-holder filtering
//! - [`providers`] — endpoint profiles (Helius, public clusters)
//!
//! # Quick start
//! ```rust,no_run
//! use std::sync::Arc;
//! use chaindrop_core::{GroupQuery, Paginator};
//! use chaindrop_solana::{providers, DasClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(providers::helius::http_client("API_KEY", providers::Cluster::Devnet)?);
//! let assets = Paginator::new(DasClient::new(transport))
//!     .fetch_all(&GroupQuery::collection("J1S9H3QjnRtBbbuD4HjPV6RpRhwuk4zKbxsnCHuTgh9w"))
//!     .await?;
//! println!("{} assets", assets.len());
//! # Ok(())
//! # }
//! ```

pub mod airdrop;
pub mod das;
pub mod ledger;
pub mod providers;
pub mod pubkey;

pub use das::{DasAsset, DasClient, Ownership};
pub use ledger::{Commitment, SolanaLedgerClient, SolanaLedgerConfig};
