//! The instruction encoder capability consumed by the batch builder.

use crate::error::EncodeError;
use crate::types::{Instruction, WorkItem};

/// Values shared by every batch of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Fee payer and signing authority.
    pub payer: String,
    pub priority_fee_micro_lamports: u64,
}

/// Turns one work item into ledger instructions.
///
/// Pure: no network access, no shared mutable state. Program-specific
/// context (collection, tree, metadata URI) lives in the implementor.
pub trait InstructionEncoder: Send + Sync + 'static {
    fn encode(&self, item: &WorkItem, ctx: &BuildContext) -> Result<Vec<Instruction>, EncodeError>;
}
