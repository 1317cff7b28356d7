//! The ledger client capability consumed by the coordinator.

use async_trait::async_trait;

use crate::error::LedgerError;
use crate::types::{Receipt, SignedOperation, SubmissionHandle};

/// Remote ledger operations needed to land one batch.
///
/// Shared read-only by every worker through `Arc<dyn LedgerClient>`;
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait LedgerClient: Send + Sync + 'static {
    /// Fetch a fresh submission handle (recent state reference + expiry bound).
    async fn recent_handle(&self) -> Result<SubmissionHandle, LedgerError>;

    /// Submit a signed operation; returns the submission identifier.
    async fn submit(&self, operation: &SignedOperation) -> Result<String, LedgerError>;

    /// Wait until `submission_id` is confirmed, rejected, or `handle` expires.
    ///
    /// Expiry must be reported as [`LedgerError::HandleExpired`], never as a
    /// rejection.
    async fn confirm(
        &self,
        submission_id: &str,
        handle: &SubmissionHandle,
    ) -> Result<Receipt, LedgerError>;
}
