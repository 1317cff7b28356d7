//! chaindrop-http — HTTP JSON-RPC transport for ChainDrop.
//!
//! ```rust,no_run
//! use chaindrop_http::HttpRpcClient;
//!
//! let client = HttpRpcClient::default_for("https://api.devnet.solana.com")
//!     .expect("valid client");
//! ```

pub mod client;

pub use client::{HttpClientConfig, HttpRpcClient};
