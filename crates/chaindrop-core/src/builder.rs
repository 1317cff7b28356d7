//! Batch builder: one batch → one composite operation.

use std::sync::Arc;

use crate::encoder::{BuildContext, InstructionEncoder};
use crate::error::BatchError;
use crate::types::{Batch, CompositeOperation};

/// Builds the instruction list for a batch through the external encoder.
///
/// A batch is atomic: if any item fails to encode, the whole batch fails
/// and no partial operation is produced.
pub struct BatchBuilder {
    encoder: Arc<dyn InstructionEncoder>,
    context: BuildContext,
}

impl BatchBuilder {
    pub fn new(encoder: Arc<dyn InstructionEncoder>, context: BuildContext) -> Self {
        Self { encoder, context }
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn build(&self, batch: &Batch) -> Result<CompositeOperation, BatchError> {
        let mut instructions = Vec::new();
        for (item_index, item) in batch.items().iter().enumerate() {
            let encoded = self
                .encoder
                .encode(item, &self.context)
                .map_err(|e| BatchError::Encoding {
                    item_index,
                    reason: e.reason,
                })?;
            instructions.extend(encoded);
        }

        Ok(CompositeOperation {
            batch_index: batch.index(),
            instructions,
            priority_fee_micro_lamports: self.context.priority_fee_micro_lamports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use crate::planner::plan;
    use crate::types::{Instruction, WorkItem};
    use std::num::NonZeroUsize;

    /// Emits one instruction per item whose data is the target's bytes;
    /// refuses targets starting with "bad".
    struct TargetEncoder;

    impl InstructionEncoder for TargetEncoder {
        fn encode(&self, item: &WorkItem, _ctx: &BuildContext) -> Result<Vec<Instruction>, EncodeError> {
            if item.target().starts_with("bad") {
                return Err(EncodeError::new(format!("invalid pubkey {}", item.target())));
            }
            Ok(vec![Instruction {
                program_id: "bubblegum".into(),
                accounts: vec![],
                data: item.target().as_bytes().to_vec(),
            }])
        }
    }

    fn builder() -> BatchBuilder {
        BatchBuilder::new(
            Arc::new(TargetEncoder),
            BuildContext {
                payer: "payer".into(),
                priority_fee_micro_lamports: 10_500,
            },
        )
    }

    #[test]
    fn instructions_follow_item_order() {
        let items = vec![WorkItem::mint("a"), WorkItem::mint("b"), WorkItem::mint("c")];
        let batch = plan(items, NonZeroUsize::new(3).unwrap()).remove(0);
        let op = builder().build(&batch).unwrap();

        let data: Vec<Vec<u8>> = op.instructions.iter().map(|ix| ix.data.clone()).collect();
        assert_eq!(data, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(op.priority_fee_micro_lamports, 10_500);

        let all = op.into_instructions();
        assert_eq!(all[0], Instruction::set_compute_unit_price(10_500));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn one_bad_item_fails_the_batch() {
        let items = vec![WorkItem::mint("a"), WorkItem::mint("bad-key"), WorkItem::mint("c")];
        let batch = plan(items, NonZeroUsize::new(3).unwrap()).remove(0);
        let err = builder().build(&batch).unwrap_err();
        match err {
            BatchError::Encoding { item_index, reason } => {
                assert_eq!(item_index, 1);
                assert!(reason.contains("bad-key"));
            }
            other => panic!("expected encoding error, got {other:?}"),
        }
    }
}
