//! `Pipeline` — the single entry point of a submission run.
//!
//! ```text
//! work items ─▶ plan ─▶ SubmissionCoordinator ─▶ RunReport
//!                              │
//!                              └─▶ OutcomeReporter (as batches complete)
//! ```

use std::sync::Arc;

use crate::builder::BatchBuilder;
use crate::config::PipelineConfig;
use crate::coordinator::SubmissionCoordinator;
use crate::encoder::{BuildContext, InstructionEncoder};
use crate::error::PipelineError;
use crate::ledger::LedgerClient;
use crate::planner::plan;
use crate::reporter::{OutcomeReporter, RunReport};
use crate::signer::OperationSigner;
use crate::types::WorkItem;

pub struct Pipeline {
    config: PipelineConfig,
    signer: Arc<dyn OperationSigner>,
    coordinator: SubmissionCoordinator,
}

impl Pipeline {
    /// Wire the collaborators together. Fails on invalid configuration.
    pub fn new(
        config: PipelineConfig,
        ledger: Arc<dyn LedgerClient>,
        signer: Arc<dyn OperationSigner>,
        encoder: Arc<dyn InstructionEncoder>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let context = BuildContext {
            payer: signer.pubkey().to_string(),
            priority_fee_micro_lamports: config.priority_fee_micro_lamports,
        };
        let builder = Arc::new(BatchBuilder::new(encoder, context));
        let coordinator =
            SubmissionCoordinator::new(ledger, signer.clone(), builder, config.concurrency)?;

        Ok(Self {
            config,
            signer,
            coordinator,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Plan `items` into batches and submit them all.
    ///
    /// Individual batch failures are reported, not returned: the only errors
    /// here are an unusable credential or invalid configuration.
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        reporter: &dyn OutcomeReporter,
    ) -> Result<RunReport, PipelineError> {
        self.signer.check().map_err(PipelineError::Credential)?;

        let item_count = items.len();
        let batches = plan(items, self.config.chunk_size()?);
        tracing::info!(
            items = item_count,
            batches = batches.len(),
            chunk_size = self.config.chunk_size,
            concurrency = self.config.concurrency,
            payer = %self.signer.pubkey(),
            "starting submission run"
        );

        let retained = batches.clone();
        let outcomes = self.coordinator.run(batches, reporter).await;
        let report = RunReport::new(retained, outcomes);

        tracing::info!(
            total = report.total_batches,
            confirmed = report.confirmed(),
            failed = report.failed(),
            "submission run finished"
        );
        Ok(report)
    }
}
