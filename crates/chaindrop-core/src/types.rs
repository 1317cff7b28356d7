//! Core data model: work items, batches, instructions, handles and outcomes.

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Program id of the compute-budget program that carries the fee-priority
/// instruction.
pub const COMPUTE_BUDGET_PROGRAM_ID: &str = "ComputeBudget111111111111111111111111111111";

/// `SetComputeUnitPrice` discriminator within the compute-budget program.
const SET_COMPUTE_UNIT_PRICE: u8 = 3;

/// One intended write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkItem {
    /// Mint one asset into the collection for `recipient`.
    Mint { recipient: String },
    /// Rewrite the metadata of an existing asset.
    UpdateMetadata { asset_id: String, owner: String },
}

impl WorkItem {
    pub fn mint(recipient: impl Into<String>) -> Self {
        Self::Mint {
            recipient: recipient.into(),
        }
    }

    pub fn update_metadata(asset_id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::UpdateMetadata {
            asset_id: asset_id.into(),
            owner: owner.into(),
        }
    }

    /// The account this write targets, for logs.
    pub fn target(&self) -> &str {
        match self {
            Self::Mint { recipient } => recipient,
            Self::UpdateMetadata { asset_id, .. } => asset_id,
        }
    }
}

/// An ordered, non-empty group of work items submitted as one transaction.
///
/// Only [`plan`](crate::planner::plan) constructs batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub(crate) index: usize,
    pub(crate) items: Vec<WorkItem>,
}

impl Batch {
    /// Position of this batch in the planned sequence (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false` for planned batches.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<WorkItem> {
        self.items
    }
}

/// Account reference of an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub pubkey: String,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// A low-level ledger instruction, opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub program_id: String,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    /// The fee-priority instruction: price per compute unit in micro-lamports.
    pub fn set_compute_unit_price(micro_lamports: u64) -> Self {
        let mut data = Vec::with_capacity(9);
        data.push(SET_COMPUTE_UNIT_PRICE);
        data.extend_from_slice(&micro_lamports.to_le_bytes());
        Self {
            program_id: COMPUTE_BUDGET_PROGRAM_ID.to_string(),
            accounts: Vec::new(),
            data,
        }
    }
}

/// The instructions derived from one batch plus its fee hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeOperation {
    pub batch_index: usize,
    /// Item-derived instructions, in work item order.
    pub instructions: Vec<Instruction>,
    pub priority_fee_micro_lamports: u64,
}

impl CompositeOperation {
    /// Full instruction list: fee-priority instruction first.
    pub fn into_instructions(self) -> Vec<Instruction> {
        let mut all = Vec::with_capacity(self.instructions.len() + 1);
        all.push(Instruction::set_compute_unit_price(
            self.priority_fee_micro_lamports,
        ));
        all.extend(self.instructions);
        all
    }
}

/// Recent ledger state reference required to submit an operation.
///
/// Deliberately not `Clone`: each submission attempt fetches its own.
#[derive(Debug, PartialEq, Eq)]
pub struct SubmissionHandle {
    pub blockhash: String,
    /// The operation is only valid while the ledger height is at or below this.
    pub last_valid_block_height: u64,
}

/// A signed, serialized operation ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOperation {
    /// Primary signature; doubles as the submission identifier.
    pub signature: String,
    /// Wire bytes of the signed transaction.
    pub payload: Vec<u8>,
}

/// What the ledger reported when the operation reached the target commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub slot: u64,
    pub confirmation_status: String,
}

/// Lifecycle of a batch inside the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Planned,
    Building,
    Signed,
    Submitted,
    Confirmed,
    Failed,
}

impl BatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Building => write!(f, "building"),
            Self::Signed => write!(f, "signed"),
            Self::Submitted => write!(f, "submitted"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal result of one batch. Recorded exactly once per batch.
#[derive(Debug, Clone)]
pub enum Outcome {
    Confirmed {
        batch_index: usize,
        signature: String,
        receipt: Receipt,
    },
    Failed {
        batch_index: usize,
        error: BatchError,
    },
}

impl Outcome {
    pub fn batch_index(&self) -> usize {
        match self {
            Self::Confirmed { batch_index, .. } | Self::Failed { batch_index, .. } => *batch_index,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    pub fn error(&self) -> Option<&BatchError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Confirmed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_unit_price_encoding() {
        let ix = Instruction::set_compute_unit_price(10_500);
        assert_eq!(ix.program_id, COMPUTE_BUDGET_PROGRAM_ID);
        assert!(ix.accounts.is_empty());
        assert_eq!(ix.data[0], 3);
        assert_eq!(u64::from_le_bytes(ix.data[1..9].try_into().unwrap()), 10_500);
    }

    #[test]
    fn priority_instruction_comes_first() {
        let item_ix = Instruction {
            program_id: "BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY".into(),
            accounts: vec![],
            data: vec![1, 2, 3],
        };
        let op = CompositeOperation {
            batch_index: 0,
            instructions: vec![item_ix.clone(), item_ix.clone()],
            priority_fee_micro_lamports: 3_500,
        };
        let all = op.into_instructions();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], Instruction::set_compute_unit_price(3_500));
        assert_eq!(all[1], item_ix);
    }

    #[test]
    fn work_item_serde_shape() {
        let item: WorkItem =
            serde_json::from_str(r#"{"kind":"mint","recipient":"9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"}"#)
                .unwrap();
        assert_eq!(item.target(), "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
    }

    #[test]
    fn terminal_states() {
        assert!(BatchState::Confirmed.is_terminal());
        assert!(BatchState::Failed.is_terminal());
        assert!(!BatchState::Submitted.is_terminal());
    }
}
