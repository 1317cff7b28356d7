//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! Features:
//! - Token-bucket rate limiting shared by every caller of the client
//! - Exponential backoff for transient errors on idempotent methods
//! - A no-retry set for methods with ledger side effects (`sendTransaction`)

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use chaindrop_rpc::error::TransportError;
use chaindrop_rpc::policy::{RateLimiter, RateLimiterConfig, RetryConfig, RetryPolicy};
use chaindrop_rpc::request::{JsonRpcRequest, JsonRpcResponse};
use chaindrop_rpc::transport::RpcTransport;

/// Methods that must never be resent automatically: a resend after a lost
/// response may duplicate a write that already landed.
pub const SUBMISSION_METHODS: &[&str] = &["sendTransaction", "sendRawTransaction"];

/// Configuration for [`HttpRpcClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub retry: RetryConfig,
    pub rate_limiter: RateLimiterConfig,
    pub request_timeout: Duration,
    /// Methods sent exactly once regardless of `retry`.
    pub no_retry_methods: HashSet<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            rate_limiter: RateLimiterConfig::default(),
            request_timeout: Duration::from_secs(30),
            no_retry_methods: SUBMISSION_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// HTTP JSON-RPC client.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
    rate_limiter: RateLimiter,
    request_timeout: Duration,
    no_retry_methods: HashSet<String>,
}

impl HttpRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry),
            rate_limiter: RateLimiter::new(config.rate_limiter),
            request_timeout: config.request_timeout,
            no_retry_methods: config.no_retry_methods,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, HttpClientConfig::default())
    }

    fn is_retry_allowed(&self, method: &str) -> bool {
        !self.no_retry_methods.contains(method)
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        self.rate_limiter.acquire(&req.method).await;

        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        ms: self.request_timeout.as_millis() as u64,
                    }
                } else {
                    TransportError::Http(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited {
                endpoint: self.url.clone(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {}: {body}", status.as_u16())));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(serde_json::from_slice::<JsonRpcResponse>(&body)?)
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send_once(&req).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() && self.is_retry_allowed(&req.method) => {
                    match self.retry.next_delay(attempt) {
                        Some(delay) => {
                            tracing::warn!(
                                attempt,
                                method = %req.method,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                url = %self.url,
                                "retrying request"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            tracing::error!(
                                attempt,
                                method = %req.method,
                                error = %e,
                                url = %self.url,
                                "max retries exceeded"
                            );
                            return Err(e);
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_methods_skip_retry_by_default() {
        let client = HttpRpcClient::default_for("http://127.0.0.1:8899").unwrap();
        assert!(!client.is_retry_allowed("sendTransaction"));
        assert!(client.is_retry_allowed("getLatestBlockhash"));
        assert!(client.is_retry_allowed("getAssetsByGroup"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transient_error() {
        let config = HttpClientConfig {
            retry: RetryConfig::disabled(),
            request_timeout: Duration::from_secs(2),
            ..Default::default()
        };
        // Port 9 (discard) is closed on any sane test host.
        let client = HttpRpcClient::new("http://127.0.0.1:9", config).unwrap();
        let err = client
            .send(JsonRpcRequest::new(1, "getBlockHeight", serde_json::json!([])))
            .await
            .unwrap_err();
        assert!(err.is_retryable(), "unexpected error: {err}");
    }
}
