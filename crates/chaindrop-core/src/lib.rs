//! chaindrop-core — batched, concurrency-limited submission of ledger writes.
//!
//! # Overview
//!
//! A run takes an ordered list of independent [`WorkItem`]s, plans them into
//! fixed-size [`Batch`]es, and lands every batch as one transaction through a
//! bounded worker pool. Each batch ends as exactly one [`Outcome`]; a failing
//! batch never blocks or cancels the others and is never retried
//! automatically.
//!
//! - [`paginator`] — full-result scans of a grouped indexer query
//! - [`planner`] — order-preserving chunking
//! - [`builder`] — batch → composite operation via an [`InstructionEncoder`]
//! - [`coordinator`] — the bounded submission pool
//! - [`reporter`] — outcome sinks and the final [`RunReport`]
//! - [`pipeline`] — the entry point wiring it all together
//!
//! The ledger, indexer, encoder and signer are capabilities supplied by the
//! caller ([`LedgerClient`], [`IndexingService`], [`InstructionEncoder`],
//! [`OperationSigner`]).

pub mod builder;
pub mod config;
pub mod coordinator;
pub mod encoder;
pub mod error;
pub mod ledger;
pub mod paginator;
pub mod pipeline;
pub mod planner;
pub mod reporter;
pub mod signer;
pub mod types;

pub use builder::BatchBuilder;
pub use config::PipelineConfig;
pub use coordinator::SubmissionCoordinator;
pub use encoder::{BuildContext, InstructionEncoder};
pub use error::{
    BatchError, EncodeError, IndexError, LedgerError, NetworkStage, PaginationError, PipelineError,
    PlanError, SignError,
};
pub use ledger::LedgerClient;
pub use paginator::{GroupQuery, IndexingService, Paginator};
pub use pipeline::Pipeline;
pub use planner::{batch_count, plan};
pub use reporter::{LogReporter, NullReporter, OutcomeReporter, RunReport};
pub use signer::OperationSigner;
pub use types::{
    AccountMeta, Batch, BatchState, CompositeOperation, Instruction, Outcome, Receipt,
    SignedOperation, SubmissionHandle, WorkItem,
};
