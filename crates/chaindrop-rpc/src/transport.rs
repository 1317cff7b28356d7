//! The `RpcTransport` trait — the seam between ChainDrop and any RPC endpoint.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Async JSON-RPC transport.
///
/// Implementations must be `Send + Sync`: a single transport is shared by
/// every submission worker through an `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the raw response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Endpoint identifier (URL or name), used in logs.
    fn url(&self) -> &str;
}

/// Call `method` and deserialize the result.
///
/// A free function rather than a trait method so it works on
/// `dyn RpcTransport`.
pub async fn call<T: DeserializeOwned>(
    transport: &dyn RpcTransport,
    id: u64,
    method: &str,
    params: Value,
) -> Result<T, TransportError> {
    let resp = transport.send(JsonRpcRequest::new(id, method, params)).await?;
    let result = resp.into_result().map_err(TransportError::Rpc)?;
    serde_json::from_value(result).map_err(TransportError::Deserialization)
}
