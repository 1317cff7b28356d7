//! Batch planner: split work items into fixed-size, order-preserving batches.

use std::num::NonZeroUsize;

use crate::types::{Batch, WorkItem};

/// Partition `items` into consecutive batches of `chunk_size`.
///
/// Only the final batch may be shorter. Concatenating the batches yields
/// `items` in the original order. An empty input yields no batches.
pub fn plan(items: Vec<WorkItem>, chunk_size: NonZeroUsize) -> Vec<Batch> {
    let chunk_size = chunk_size.get();
    let mut batches = Vec::with_capacity(batch_count(items.len(), chunk_size));
    let mut items = items.into_iter().peekable();

    while items.peek().is_some() {
        let chunk: Vec<WorkItem> = items.by_ref().take(chunk_size).collect();
        batches.push(Batch {
            index: batches.len(),
            items: chunk,
        });
    }
    batches
}

/// Number of batches `plan` produces: `ceil(item_count / chunk_size)`.
pub fn batch_count(item_count: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    item_count.div_ceil(chunk_size)
}
