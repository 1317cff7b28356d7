//! Per-run pipeline configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::coordinator::DEFAULT_CONCURRENCY;
use crate::error::PlanError;
use crate::paginator::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};

/// Default work items per batch (one transaction).
pub const DEFAULT_CHUNK_SIZE: usize = 3;
/// Priority fee used for mint batches, micro-lamports per compute unit.
pub const MINT_PRIORITY_FEE: u64 = 10_500;
/// Priority fee used for metadata updates.
pub const UPDATE_PRIORITY_FEE: u64 = 3_500;

/// Parameters of one run, passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Work items per batch.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum batches in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Compute unit price attached to every batch.
    #[serde(default = "default_priority_fee")]
    pub priority_fee_micro_lamports: u64,
    /// Items requested per indexer page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Safety bound on pages per scan.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_chunk_size() -> usize { DEFAULT_CHUNK_SIZE }
fn default_concurrency() -> usize { DEFAULT_CONCURRENCY }
fn default_priority_fee() -> u64 { MINT_PRIORITY_FEE }
fn default_page_size() -> u32 { DEFAULT_PAGE_SIZE }
fn default_max_pages() -> u32 { DEFAULT_MAX_PAGES }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            priority_fee_micro_lamports: MINT_PRIORITY_FEE,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PipelineConfig {
    /// One asset per transaction at the lower update fee.
    pub fn metadata_update() -> Self {
        Self {
            chunk_size: 1,
            priority_fee_micro_lamports: UPDATE_PRIORITY_FEE,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        self.chunk_size()?;
        if self.concurrency == 0 {
            return Err(PlanError::ZeroConcurrency);
        }
        if self.page_size == 0 {
            return Err(PlanError::ZeroPageSize);
        }
        Ok(())
    }

    pub fn chunk_size(&self) -> Result<NonZeroUsize, PlanError> {
        NonZeroUsize::new(self.chunk_size).ok_or(PlanError::ZeroChunkSize)
    }
}
