//! Error types for the submission pipeline.
//!
//! Per-batch failures never escape the coordinator: they are folded into
//! [`BatchError`] and carried by a `Failed` outcome. Only [`PipelineError`]
//! aborts a run.

use thiserror::Error;

/// The instruction encoder could not turn a work item into instructions.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct EncodeError {
    pub reason: String,
}

impl EncodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the signing credential.
#[derive(Debug, Clone, Error)]
pub enum SignError {
    /// The credential itself is unusable; no batch can be signed.
    #[error("credential unavailable: {0}")]
    Credential(String),

    /// This particular operation could not be assembled or signed.
    #[error("failed to sign operation: {0}")]
    Operation(String),
}

/// Errors raised by the ledger client capability.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Transport-level failure (connection, timeout, rate limit).
    #[error("network error: {0}")]
    Network(String),

    /// The ledger explicitly refused or failed the operation.
    #[error("rejected by ledger: {0}")]
    Rejected(String),

    /// The handle's validity boundary passed before confirmation.
    #[error("submission handle expired (last valid block height {last_valid_block_height})")]
    HandleExpired { last_valid_block_height: u64 },
}

/// Errors raised by the indexing service capability.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("indexer transport error: {0}")]
    Transport(String),

    /// The indexer answered with an explicit error object.
    #[error("indexer rejected query: {0}")]
    Rejected(String),

    #[error("indexer response could not be decoded: {0}")]
    Decode(String),
}

/// Errors that abort a pagination scan.
#[derive(Debug, Clone, Error)]
pub enum PaginationError {
    #[error("page {page} failed: {source}")]
    Service {
        page: u32,
        #[source]
        source: IndexError,
    },

    #[error("pagination exceeded {max_pages} pages without reaching an empty page")]
    PageLimitExceeded { max_pages: u32 },
}

/// Which network round trip a transient failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    Handle,
    Submit,
    Confirm,
}

impl std::fmt::Display for NetworkStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handle => write!(f, "handle acquisition"),
            Self::Submit => write!(f, "submission"),
            Self::Confirm => write!(f, "confirmation"),
        }
    }
}

/// Why a batch ended in the `Failed` state.
#[derive(Debug, Clone, Error)]
pub enum BatchError {
    /// A work item could not be encoded; nothing was sent.
    #[error("encoding failed for item {item_index}: {reason}")]
    Encoding { item_index: usize, reason: String },

    #[error("{0}")]
    Signing(String),

    /// Transient network failure during one of the round trips.
    #[error("network error during {stage}: {reason}")]
    Network { stage: NetworkStage, reason: String },

    /// Explicit rejection (preflight failure or on-chain error).
    #[error("rejected: {0}")]
    Rejected(String),

    /// Confirmation was not observed before the handle expired.
    #[error("handle expired before confirmation of {signature} (last valid block height {last_valid_block_height})")]
    HandleExpired {
        signature: String,
        last_valid_block_height: u64,
    },

    #[error("submission worker panicked")]
    Panicked,
}

impl BatchError {
    pub(crate) fn from_ledger(err: LedgerError, stage: NetworkStage, signature: Option<&str>) -> Self {
        match err {
            LedgerError::Network(reason) => Self::Network { stage, reason },
            LedgerError::Rejected(reason) => Self::Rejected(reason),
            LedgerError::HandleExpired {
                last_valid_block_height,
            } => Self::HandleExpired {
                signature: signature.unwrap_or_default().to_string(),
                last_valid_block_height,
            },
        }
    }

    /// Returns `true` if the write may still have landed on the ledger, so
    /// the caller must verify on-chain state before resubmitting.
    pub fn may_have_landed(&self) -> bool {
        match self {
            Self::HandleExpired { .. } | Self::Panicked => true,
            Self::Network { stage, .. } => *stage != NetworkStage::Handle,
            _ => false,
        }
    }

    /// Short machine-friendly label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Encoding { .. } => "encoding",
            Self::Signing(_) => "signing",
            Self::Network { .. } => "network",
            Self::Rejected(_) => "rejected",
            Self::HandleExpired { .. } => "handle_expired",
            Self::Panicked => "panicked",
        }
    }
}

/// Invalid run parameters, detected before any batch is built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    #[error("concurrency limit must be positive")]
    ZeroConcurrency,

    #[error("page size must be positive")]
    ZeroPageSize,
}

/// Errors fatal to a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] PlanError),

    #[error("signing credential check failed: {0}")]
    Credential(#[source] SignError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_handle_is_distinct_from_rejection() {
        let expired = BatchError::from_ledger(
            LedgerError::HandleExpired {
                last_valid_block_height: 42,
            },
            NetworkStage::Confirm,
            Some("sig"),
        );
        let rejected = BatchError::from_ledger(
            LedgerError::Rejected("InstructionError".into()),
            NetworkStage::Confirm,
            Some("sig"),
        );
        assert_eq!(expired.kind(), "handle_expired");
        assert_eq!(rejected.kind(), "rejected");
        assert!(expired.may_have_landed());
        assert!(!rejected.may_have_landed());
    }

    #[test]
    fn network_failure_before_submit_cannot_have_landed() {
        let before = BatchError::Network {
            stage: NetworkStage::Handle,
            reason: "connection refused".into(),
        };
        let after = BatchError::Network {
            stage: NetworkStage::Confirm,
            reason: "timeout".into(),
        };
        assert!(!before.may_have_landed());
        assert!(after.may_have_landed());
    }
}
