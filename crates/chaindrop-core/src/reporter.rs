//! Outcome reporting: a side-effect-only sink the coordinator feeds as
//! batches reach a terminal state.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::types::{Batch, Outcome, WorkItem};

/// Receives every outcome exactly once, in completion order.
///
/// `completed` is the 0-based completion ordinal, `total` the number of
/// planned batches. Implementations must not block.
pub trait OutcomeReporter: Send + Sync {
    fn report(&self, completed: usize, total: usize, outcome: &Outcome);
}

/// Reporter that discards everything.
#[derive(Debug, Default)]
pub struct NullReporter;

impl OutcomeReporter for NullReporter {
    fn report(&self, _completed: usize, _total: usize, _outcome: &Outcome) {}
}

/// Logs each outcome through `tracing` and keeps running totals.
#[derive(Debug, Default)]
pub struct LogReporter {
    confirmed: AtomicUsize,
    failed: AtomicUsize,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirmed(&self) -> usize {
        self.confirmed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
}

impl OutcomeReporter for LogReporter {
    fn report(&self, completed: usize, total: usize, outcome: &Outcome) {
        let n = completed + 1;
        match outcome {
            Outcome::Confirmed {
                batch_index,
                signature,
                receipt,
            } => {
                self.confirmed.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    batch = batch_index,
                    %signature,
                    slot = receipt.slot,
                    status = %receipt.confirmation_status,
                    "Tx {n} out of {total} succeeded"
                );
            }
            Outcome::Failed { batch_index, error } => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    batch = batch_index,
                    kind = error.kind(),
                    may_have_landed = error.may_have_landed(),
                    error = %error,
                    "Tx {n} out of {total} failed"
                );
            }
        }
    }
}

/// Aggregated result of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub total_batches: usize,
    /// Outcomes in completion order.
    pub outcomes: Vec<Outcome>,
    /// Work items of failed batches, in planned order, ready to re-plan.
    pub failed_items: Vec<WorkItem>,
}

impl RunReport {
    /// Correlate outcomes back to the planned batches.
    pub fn new(batches: Vec<Batch>, outcomes: Vec<Outcome>) -> Self {
        let mut failed = vec![false; batches.len()];
        for outcome in &outcomes {
            if let Some(slot) = failed.get_mut(outcome.batch_index()) {
                *slot = !outcome.is_confirmed();
            }
        }
        let failed_items = batches
            .into_iter()
            .filter(|b| failed.get(b.index()).copied().unwrap_or(false))
            .flat_map(Batch::into_items)
            .collect();

        Self {
            total_batches: failed.len(),
            outcomes,
            failed_items,
        }
    }

    pub fn confirmed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_confirmed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.confirmed()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0 && self.outcomes.len() == self.total_batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchError;
    use crate::planner::plan;
    use crate::types::Receipt;
    use std::num::NonZeroUsize;

    fn confirmed(batch_index: usize) -> Outcome {
        Outcome::Confirmed {
            batch_index,
            signature: format!("sig-{batch_index}"),
            receipt: Receipt {
                slot: 1,
                confirmation_status: "confirmed".into(),
            },
        }
    }

    #[test]
    fn failed_items_come_from_failed_batches_only() {
        let items: Vec<WorkItem> = (0..5).map(|i| WorkItem::mint(format!("r{i}"))).collect();
        let batches = plan(items, NonZeroUsize::new(2).unwrap());
        let outcomes = vec![
            confirmed(2),
            Outcome::Failed {
                batch_index: 1,
                error: BatchError::Rejected("custom program error: 0x1".into()),
            },
            confirmed(0),
        ];
        let report = RunReport::new(batches, outcomes);

        assert_eq!(report.total_batches, 3);
        assert_eq!(report.confirmed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_items, vec![WorkItem::mint("r2"), WorkItem::mint("r3")]);
        assert!(!report.is_complete_success());
    }

    #[test]
    fn log_reporter_counts() {
        let reporter = LogReporter::new();
        reporter.report(0, 2, &confirmed(0));
        reporter.report(
            1,
            2,
            &Outcome::Failed {
                batch_index: 1,
                error: BatchError::Panicked,
            },
        );
        assert_eq!(reporter.confirmed(), 1);
        assert_eq!(reporter.failed(), 1);
    }
}
