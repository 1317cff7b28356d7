//! Helius profile. Helius serves both the standard RPC and the DAS API.

use chaindrop_http::{HttpClientConfig, HttpRpcClient};
use chaindrop_rpc::policy::RateLimiterConfig;
use chaindrop_rpc::TransportError;

use super::Cluster;

pub fn rpc_url(api_key: &str, cluster: Cluster) -> String {
    match cluster {
        Cluster::Mainnet => format!("https://mainnet.helius-rpc.com/?api-key={api_key}"),
        Cluster::Devnet => format!("https://devnet.helius-rpc.com/?api-key={api_key}"),
    }
}

/// Free tier allows 10 RPC req/s but only 2 DAS req/s.
pub const DAS_COST: f64 = 5.0;

/// Client config for the Helius free tier.
pub fn config() -> HttpClientConfig {
    HttpClientConfig {
        rate_limiter: RateLimiterConfig::per_second(10.0).with_cost("getAssetsByGroup", DAS_COST),
        ..HttpClientConfig::default()
    }
}

pub fn http_client(api_key: &str, cluster: Cluster) -> Result<HttpRpcClient, TransportError> {
    HttpRpcClient::new(rpc_url(api_key, cluster), config())
}
