//! Submission coordinator: a bounded worker pool driving batches through
//! build → handle → sign → submit → confirm.
//!
//! # Concurrency model
//! ```text
//!  planned batches ──FIFO──▶ [Semaphore: N permits] ──spawn──▶ worker ─┐
//!                                                                       │ Outcome
//!  reporter ◀──────────────── mpsc channel ◀────────────────────────────┘
//! ```
//! A worker holds its permit from admission until its batch is terminal, so
//! at most N batches are ever in flight. Workers share only the read-only
//! ledger client, signer and builder; each owns its batch and outcome.
//! Failures are converted to `Failed` outcomes at the worker boundary and
//! never cancel other batches. Nothing is retried.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::builder::BatchBuilder;
use crate::error::{BatchError, NetworkStage, PlanError};
use crate::ledger::LedgerClient;
use crate::reporter::OutcomeReporter;
use crate::signer::OperationSigner;
use crate::types::{Batch, BatchState, Outcome, Receipt};

/// Default number of batches in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 5;

pub struct SubmissionCoordinator {
    worker: Worker,
    concurrency: usize,
}

impl SubmissionCoordinator {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        signer: Arc<dyn OperationSigner>,
        builder: Arc<BatchBuilder>,
        concurrency: usize,
    ) -> Result<Self, PlanError> {
        if concurrency == 0 {
            return Err(PlanError::ZeroConcurrency);
        }
        Ok(Self {
            worker: Worker {
                ledger,
                signer,
                builder,
            },
            concurrency,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every batch to a terminal state and return one outcome per batch,
    /// in completion order. Must be called within a Tokio runtime.
    pub async fn run(&self, batches: Vec<Batch>, reporter: &dyn OutcomeReporter) -> Vec<Outcome> {
        let total = batches.len();
        let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

        let admit = async move {
            let permits = Arc::new(Semaphore::new(self.concurrency));
            let mut workers = JoinSet::new();

            for batch in batches {
                transition(batch.index(), BatchState::Planned);
                let permit = match permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let worker = self.worker.clone();
                let tx = tx.clone();
                workers.spawn(async move {
                    let batch_index = batch.index();
                    let outcome = AssertUnwindSafe(worker.process(batch))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| Outcome::Failed {
                            batch_index,
                            error: BatchError::Panicked,
                        });
                    let _ = tx.send(outcome);
                    drop(permit);
                });
            }
            drop(tx);

            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "submission worker aborted");
                }
            }
        };

        let collect = async move {
            let mut outcomes = Vec::with_capacity(total);
            while let Some(outcome) = rx.recv().await {
                reporter.report(outcomes.len(), total, &outcome);
                outcomes.push(outcome);
            }
            outcomes
        };

        let ((), outcomes) = tokio::join!(admit, collect);
        outcomes
    }
}

/// Per-batch pipeline. Cloned into every spawned task; all fields are
/// shared read-only capabilities.
#[derive(Clone)]
struct Worker {
    ledger: Arc<dyn LedgerClient>,
    signer: Arc<dyn OperationSigner>,
    builder: Arc<BatchBuilder>,
}

impl Worker {
    async fn process(self, batch: Batch) -> Outcome {
        let batch_index = batch.index();
        match self.drive(&batch).await {
            Ok((signature, receipt)) => {
                transition(batch_index, BatchState::Confirmed);
                Outcome::Confirmed {
                    batch_index,
                    signature,
                    receipt,
                }
            }
            Err(error) => {
                transition(batch_index, BatchState::Failed);
                Outcome::Failed { batch_index, error }
            }
        }
    }

    async fn drive(&self, batch: &Batch) -> Result<(String, Receipt), BatchError> {
        let batch_index = batch.index();

        // Encode before touching the network so a bad item costs nothing.
        transition(batch_index, BatchState::Building);
        let operation = self.builder.build(batch)?;

        let handle = self
            .ledger
            .recent_handle()
            .await
            .map_err(|e| BatchError::from_ledger(e, NetworkStage::Handle, None))?;

        let signed = self
            .signer
            .sign(&operation.into_instructions(), &handle)
            .map_err(|e| BatchError::Signing(e.to_string()))?;
        transition(batch_index, BatchState::Signed);

        let signature = self
            .ledger
            .submit(&signed)
            .await
            .map_err(|e| BatchError::from_ledger(e, NetworkStage::Submit, Some(signed.signature.as_str())))?;
        transition(batch_index, BatchState::Submitted);

        let receipt = self
            .ledger
            .confirm(&signature, &handle)
            .await
            .map_err(|e| BatchError::from_ledger(e, NetworkStage::Confirm, Some(signature.as_str())))?;

        Ok((signature, receipt))
    }
}

fn transition(batch: usize, state: BatchState) {
    tracing::debug!(batch, %state, "batch state");
}
