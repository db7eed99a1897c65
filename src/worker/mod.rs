//! Parallel mnemonic search.
//!
//! This module provides:
//! - CPU workers running the derive-and-score loop
//! - The worker pool that owns threads and the candidate channel
//! - The coordinator that owns the best record and the shared threshold

mod coordinator;
mod cpu;
mod pool;

use crate::crypto::{Address, EntropyError};

pub use coordinator::{BestState, Coordinator, Improvement};
pub use cpu::{CpuWorker, SearchStats};
pub use pool::WorkerPool;

/// A scored mnemonic sent from a worker to the coordinator.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The mnemonic phrase
    pub phrase: String,
    /// The derived address
    pub address: Address,
    /// Score under the active rule
    pub score: u32,
    /// The ID of the worker that found it
    pub worker_id: usize,
}

/// Errors that end the search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}
