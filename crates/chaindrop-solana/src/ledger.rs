//! Solana JSON-RPC ledger client.
//!
//! Confirmation mirrors the blockhash-expiry strategy: poll the signature
//! status until it reaches the requested commitment, and give up once the
//! block height passes the handle's `last_valid_block_height`. After that
//! point the transaction can no longer be included, so "expired" is a
//! definitive answer distinct from a rejection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use chaindrop_core::{LedgerClient, LedgerError, Receipt, SignedOperation, SubmissionHandle};
use chaindrop_rpc::transport::{call, RpcTransport};
use chaindrop_rpc::TransportError;

/// Commitment level, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SolanaLedgerConfig {
    pub commitment: Commitment,
    /// Delay between signature status polls.
    pub poll_interval: Duration,
    pub skip_preflight: bool,
}

impl Default for SolanaLedgerConfig {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            poll_interval: Duration::from_millis(500),
            skip_preflight: false,
        }
    }
}

/// `{ context, value }` wrapper used by most Solana RPC results.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    slot: u64,
    confirmations: Option<u64>,
    err: Option<Value>,
    confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Effective commitment; `confirmations: null` without a status means rooted.
    fn commitment(&self) -> Commitment {
        match (self.confirmation_status, self.confirmations) {
            (Some(c), _) => c,
            (None, None) => Commitment::Finalized,
            (None, Some(_)) => Commitment::Confirmed,
        }
    }
}

/// [`LedgerClient`] over any JSON-RPC transport.
pub struct SolanaLedgerClient {
    transport: Arc<dyn RpcTransport>,
    config: SolanaLedgerConfig,
    next_id: AtomicU64,
}

impl SolanaLedgerClient {
    pub fn new(transport: Arc<dyn RpcTransport>, config: SolanaLedgerConfig) -> Self {
        Self {
            transport,
            config,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_defaults(transport: Arc<dyn RpcTransport>) -> Self {
        Self::new(transport, SolanaLedgerConfig::default())
    }

    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        call(self.transport.as_ref(), id, method, params).await
    }

    /// Current block height at the configured commitment.
    pub async fn block_height(&self) -> Result<u64, LedgerError> {
        self.rpc(
            "getBlockHeight",
            json!([{ "commitment": self.config.commitment.as_str() }]),
        )
        .await
        .map_err(network)
    }

    async fn signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>, LedgerError> {
        let resp: RpcResponse<Vec<Option<SignatureStatus>>> = self
            .rpc(
                "getSignatureStatuses",
                json!([[signature], { "searchTransactionHistory": false }]),
            )
            .await
            .map_err(network)?;
        Ok(resp.value.into_iter().next().flatten())
    }

    /// Map a status to a terminal result, or `None` if still pending.
    fn settle(&self, signature: &str, status: Option<SignatureStatus>) -> Option<Result<Receipt, LedgerError>> {
        let status = status?;
        if let Some(err) = status.err {
            return Some(Err(LedgerError::Rejected(format!(
                "transaction {signature} failed: {err}"
            ))));
        }
        let reached = status.commitment();
        if reached >= self.config.commitment {
            return Some(Ok(Receipt {
                slot: status.slot,
                confirmation_status: reached.to_string(),
            }));
        }
        None
    }
}

/// Node-side conditions that say nothing about the transaction itself:
/// node unhealthy (behind) and min context slot not reached.
const TRANSIENT_RPC_CODES: &[i64] = &[-32005, -32016];

fn network(e: TransportError) -> LedgerError {
    LedgerError::Network(e.to_string())
}

#[async_trait]
impl LedgerClient for SolanaLedgerClient {
    async fn recent_handle(&self) -> Result<SubmissionHandle, LedgerError> {
        let resp: RpcResponse<LatestBlockhash> = self
            .rpc(
                "getLatestBlockhash",
                json!([{ "commitment": self.config.commitment.as_str() }]),
            )
            .await
            .map_err(network)?;
        Ok(SubmissionHandle {
            blockhash: resp.value.blockhash,
            last_valid_block_height: resp.value.last_valid_block_height,
        })
    }

    async fn submit(&self, operation: &SignedOperation) -> Result<String, LedgerError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&operation.payload);
        let params = json!([
            encoded,
            {
                "encoding": "base64",
                "skipPreflight": self.config.skip_preflight,
                "preflightCommitment": self.config.commitment.as_str(),
            }
        ]);
        match self.rpc::<String>("sendTransaction", params).await {
            Ok(signature) => {
                if signature != operation.signature {
                    tracing::warn!(
                        expected = %operation.signature,
                        returned = %signature,
                        "node returned a different signature"
                    );
                }
                Ok(signature)
            }
            Err(TransportError::Rpc(err)) if TRANSIENT_RPC_CODES.contains(&err.code) => {
                Err(LedgerError::Network(format!("{} (code {})", err.message, err.code)))
            }
            Err(TransportError::Rpc(err)) => Err(LedgerError::Rejected(err.message)),
            Err(e) => Err(network(e)),
        }
    }

    async fn confirm(
        &self,
        submission_id: &str,
        handle: &SubmissionHandle,
    ) -> Result<Receipt, LedgerError> {
        loop {
            let status = self.signature_status(submission_id).await?;
            if let Some(result) = self.settle(submission_id, status) {
                return result;
            }

            let height = self.block_height().await?;
            if height > handle.last_valid_block_height {
                // The status may have landed between the two calls.
                let status = self.signature_status(submission_id).await?;
                if let Some(result) = self.settle(submission_id, status) {
                    return result;
                }
                tracing::warn!(
                    signature = %submission_id,
                    height,
                    last_valid_block_height = handle.last_valid_block_height,
                    "blockhash expired before confirmation"
                );
                return Err(LedgerError::HandleExpired {
                    last_valid_block_height: handle.last_valid_block_height,
                });
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaindrop_rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers each method from its own scripted queue; the last entry repeats.
    #[derive(Default)]
    struct ScriptedTransport {
        scripts: Mutex<Vec<(String, VecDeque<Result<Value, JsonRpcError>>)>>,
        requests: Mutex<Vec<JsonRpcRequest>>,
    }

    impl ScriptedTransport {
        fn on(self, method: &str, answers: Vec<Result<Value, JsonRpcError>>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .push((method.to_string(), answers.into()));
            self
        }

        fn count(&self, method: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.method == method)
                .count()
        }
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            self.requests.lock().unwrap().push(req.clone());
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts
                .iter_mut()
                .find(|(m, _)| *m == req.method)
                .map(|(_, q)| q)
                .ok_or_else(|| TransportError::Http(format!("unexpected method {}", req.method)))?;
            let answer = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
            .ok_or_else(|| TransportError::Http("script exhausted".into()))?;
            Ok(match answer {
                Ok(result) => JsonRpcResponse::success(req.id, result),
                Err(error) => JsonRpcResponse {
                    jsonrpc: "2.0".into(),
                    id: req.id,
                    result: None,
                    error: Some(error),
                },
            })
        }

        fn url(&self) -> &str {
            "scripted"
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> SolanaLedgerClient {
        SolanaLedgerClient::new(
            transport,
            SolanaLedgerConfig {
                poll_interval: Duration::from_millis(1),
                ..Default::default()
            },
        )
    }

    fn handle(last_valid_block_height: u64) -> SubmissionHandle {
        SubmissionHandle {
            blockhash: "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N".into(),
            last_valid_block_height,
        }
    }

    fn status(value: Value) -> Result<Value, JsonRpcError> {
        Ok(json!({ "context": { "slot": 300 }, "value": [value] }))
    }

    #[tokio::test]
    async fn recent_handle_parses_blockhash() {
        let transport = Arc::new(ScriptedTransport::default().on(
            "getLatestBlockhash",
            vec![Ok(json!({
                "context": { "slot": 2792 },
                "value": {
                    "blockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                    "lastValidBlockHeight": 3090
                }
            }))],
        ));
        let handle = client(transport).recent_handle().await.unwrap();
        assert_eq!(handle.blockhash, "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N");
        assert_eq!(handle.last_valid_block_height, 3090);
    }

    #[tokio::test]
    async fn submit_sends_base64_and_maps_rpc_error_to_rejection() {
        let transport = Arc::new(ScriptedTransport::default().on(
            "sendTransaction",
            vec![Err(JsonRpcError {
                code: -32002,
                message: "Transaction simulation failed: Blockhash not found".into(),
                data: None,
            })],
        ));
        let op = SignedOperation {
            signature: "sig".into(),
            payload: vec![1, 2, 3],
        };
        let err = client(transport.clone()).submit(&op).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(ref m) if m.contains("Blockhash not found")));

        let sent = transport.requests.lock().unwrap()[0].clone();
        assert_eq!(sent.params[0], "AQID");
        assert_eq!(sent.params[1]["encoding"], "base64");
        assert_eq!(sent.params[1]["preflightCommitment"], "confirmed");
    }

    #[tokio::test]
    async fn node_behind_is_a_network_failure() {
        let transport = Arc::new(ScriptedTransport::default().on(
            "sendTransaction",
            vec![Err(JsonRpcError {
                code: -32005,
                message: "Node is behind by 42 slots".into(),
                data: None,
            })],
        ));
        let op = SignedOperation {
            signature: "sig".into(),
            payload: vec![1],
        };
        let err = client(transport).submit(&op).await.unwrap_err();
        assert!(matches!(err, LedgerError::Network(ref m) if m.contains("-32005")));
    }

    #[tokio::test]
    async fn confirm_waits_for_commitment() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .on(
                    "getSignatureStatuses",
                    vec![
                        status(Value::Null),
                        status(json!({ "slot": 301, "confirmations": 0, "err": null, "confirmationStatus": "processed" })),
                        status(json!({ "slot": 301, "confirmations": 1, "err": null, "confirmationStatus": "confirmed" })),
                    ],
                )
                .on("getBlockHeight", vec![Ok(json!(100))]),
        );
        let receipt = client(transport.clone())
            .confirm("sig", &handle(150))
            .await
            .unwrap();
        assert_eq!(receipt.slot, 301);
        assert_eq!(receipt.confirmation_status, "confirmed");
        assert_eq!(transport.count("getSignatureStatuses"), 3);
    }

    #[tokio::test]
    async fn confirm_reports_on_chain_error_as_rejection() {
        let transport = Arc::new(ScriptedTransport::default().on(
            "getSignatureStatuses",
            vec![status(json!({
                "slot": 5,
                "confirmations": 1,
                "err": { "InstructionError": [1, { "Custom": 6001 }] },
                "confirmationStatus": "confirmed"
            }))],
        ));
        let err = client(transport).confirm("sig", &handle(150)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(ref m) if m.contains("InstructionError")));
    }

    #[tokio::test]
    async fn confirm_expires_past_last_valid_height() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .on("getSignatureStatuses", vec![status(Value::Null)])
                .on("getBlockHeight", vec![Ok(json!(149)), Ok(json!(151))]),
        );
        let err = client(transport.clone()).confirm("sig", &handle(150)).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::HandleExpired {
                last_valid_block_height: 150
            }
        ));
        assert_eq!(transport.count("getBlockHeight"), 2);
    }

    #[test]
    fn missing_confirmation_status_means_rooted() {
        let status: SignatureStatus = serde_json::from_value(json!({
            "slot": 1, "confirmations": null, "err": null, "confirmationStatus": null
        }))
        .unwrap();
        assert_eq!(status.commitment(), Commitment::Finalized);
    }
}
