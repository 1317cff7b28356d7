//! Public Solana Foundation endpoints. No DAS support; heavily rate limited.

use chaindrop_http::{HttpClientConfig, HttpRpcClient};
use chaindrop_rpc::policy::RateLimiterConfig;
use chaindrop_rpc::TransportError;

use super::Cluster;

pub const MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEVNET_URL: &str = "https://api.devnet.solana.com";

pub fn url(cluster: Cluster) -> &'static str {
    match cluster {
        Cluster::Mainnet => MAINNET_URL,
        Cluster::Devnet => DEVNET_URL,
    }
}

pub fn mainnet() -> Result<HttpRpcClient, TransportError> {
    client(Cluster::Mainnet)
}

pub fn devnet() -> Result<HttpRpcClient, TransportError> {
    client(Cluster::Devnet)
}

fn client(cluster: Cluster) -> Result<HttpRpcClient, TransportError> {
    let config = HttpClientConfig {
        rate_limiter: RateLimiterConfig::per_second(4.0),
        ..HttpClientConfig::default()
    };
    HttpRpcClient::new(url(cluster), config)
}
