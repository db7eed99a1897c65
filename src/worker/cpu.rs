//! CPU worker running the derive-and-score loop.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{SendTimeoutError, Sender};
use tracing::debug;

use crate::crypto::{AccountDeriver, Entropy, EntropyError};
use crate::scoring::ScoreRule;

use super::Candidate;

/// Candidates evaluated between stop-flag checks and stats flushes.
const BATCH_SIZE: u64 = 8;

/// How long a report may wait on a full channel before re-checking the stop flag.
const SEND_TIMEOUT: Duration = Duration::from_millis(100);

/// Counters shared by all workers.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Candidates fully derived and scored
    pub candidates_evaluated: AtomicU64,
    /// Candidates sent to the coordinator
    pub candidates_reported: AtomicU64,
    /// Candidates discarded because a derived key was out of range
    pub derivation_rejects: AtomicU64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_evaluated(&self) -> u64 {
        self.candidates_evaluated.load(Ordering::Relaxed)
    }

    pub fn total_reported(&self) -> u64 {
        self.candidates_reported.load(Ordering::Relaxed)
    }

    pub fn total_rejects(&self) -> u64 {
        self.derivation_rejects.load(Ordering::Relaxed)
    }
}

/// A CPU worker that generates mnemonics and scores their addresses.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Pipeline from entropy to address
    deriver: AccountDeriver,
    /// Scoring rule
    rule: ScoreRule,
    /// Best score confirmed by the coordinator
    best_score: Arc<AtomicU32>,
    /// Channel to the coordinator
    candidate_tx: Sender<Candidate>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<SearchStats>,
}

impl CpuWorker {
    pub fn new(
        id: usize,
        deriver: AccountDeriver,
        rule: ScoreRule,
        best_score: Arc<AtomicU32>,
        candidate_tx: Sender<Candidate>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<SearchStats>,
    ) -> Self {
        Self {
            id,
            deriver,
            rule,
            best_score,
            candidate_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Returns `Ok` once the stop flag is raised or the coordinator hangs up.
    /// An unreadable RNG is the only error.
    pub fn run(&self) -> Result<(), EntropyError> {
        debug!(worker = self.id, path = %self.deriver.path(), "worker started");

        while !self.stop_flag.load(Ordering::Relaxed) {
            let mut evaluated = 0;

            for _ in 0..BATCH_SIZE {
                let entropy = Entropy::generate()?;

                let (mnemonic, keypair) = match self.deriver.derive(&entropy) {
                    Ok(derived) => derived,
                    Err(e) => {
                        debug!(worker = self.id, error = %e, "discarding candidate");
                        self.stats.derivation_rejects.fetch_add(1, Ordering::Relaxed);
                        continue;
                    }
                };
                evaluated += 1;

                let score = self.rule.score_address(keypair.address());
                if score < self.best_score.load(Ordering::Acquire) {
                    continue;
                }

                self.stats.candidates_reported.fetch_add(1, Ordering::Relaxed);
                let candidate = Candidate {
                    phrase: mnemonic.into_phrase(),
                    address: *keypair.address(),
                    score,
                    worker_id: self.id,
                };
                if !self.report(candidate) {
                    self.stats.candidates_evaluated.fetch_add(evaluated, Ordering::Relaxed);
                    debug!(worker = self.id, "coordinator gone, worker exiting");
                    return Ok(());
                }
            }

            self.stats.candidates_evaluated.fetch_add(evaluated, Ordering::Relaxed);
        }

        debug!(worker = self.id, "worker stopped");
        Ok(())
    }

    /// Hands a candidate to the coordinator. Returns false if the search is over.
    fn report(&self, mut candidate: Candidate) -> bool {
        loop {
            match self.candidate_tx.send_timeout(candidate, SEND_TIMEOUT) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(unsent)) => {
                    if self.stop_flag.load(Ordering::Relaxed) {
                        return false;
                    }
                    candidate = unsent;
                }
                Err(SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }
}
