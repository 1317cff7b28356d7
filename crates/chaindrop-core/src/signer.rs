//! The signing credential capability.

use crate::error::SignError;
use crate::types::{Instruction, SignedOperation, SubmissionHandle};

/// Assembles and signs an operation locally.
///
/// Signing must be side-effect free and never touch the network; the
/// coordinator calls it from many workers at once.
pub trait OperationSigner: Send + Sync + 'static {
    /// Public key of the credential (fee payer).
    fn pubkey(&self) -> &str;

    /// Verify the credential is usable. Called once before a run; failure
    /// aborts the run since no batch could be signed.
    fn check(&self) -> Result<(), SignError> {
        Ok(())
    }

    /// Compile `instructions` against `handle` and sign the result.
    fn sign(
        &self,
        instructions: &[Instruction],
        handle: &SubmissionHandle,
    ) -> Result<SignedOperation, SignError>;
}
