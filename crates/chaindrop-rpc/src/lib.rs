//! chaindrop-rpc — JSON-RPC plumbing shared by every ChainDrop transport.
//!
//! # Overview
//!
//! The crate defines:
//!
//! - [`RpcTransport`] — the async trait every transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] — JSON-RPC 2.0 wire types
//! - [`TransportError`] — structured transport error
//! - [`policy`] module — token-bucket rate limiter and retry backoff

pub mod error;
pub mod policy;
pub mod request;
pub mod transport;

pub use error::TransportError;
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::{call, RpcTransport};
