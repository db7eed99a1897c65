//! Worker pool management.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::{error, info};

use crate::crypto::{AccountDeriver, DerivationPath, Dictionary, EntropyError};
use crate::scoring::ScoreRule;

use super::cpu::{CpuWorker, SearchStats};
use super::{Candidate, SearchError};

/// Bound on reports waiting for the coordinator.
const CHANNEL_CAPACITY: usize = 256;

/// Manages the worker threads of one search.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<Result<(), EntropyError>>>>,
    /// Channel receiver for candidates
    candidate_rx: Receiver<Candidate>,
    /// Best score confirmed by the coordinator, read by every worker
    best_score: Arc<AtomicU32>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<SearchStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` threads searching with `rule` along `path`.
    pub fn new(
        num_workers: usize,
        rule: ScoreRule,
        path: DerivationPath,
        dictionary: Dictionary,
    ) -> Result<Self, SearchError> {
        let (candidate_tx, candidate_rx) = bounded(CHANNEL_CAPACITY);
        let best_score = Arc::new(AtomicU32::new(0));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(SearchStats::new());

        let mut pool = Self {
            num_workers,
            handles: None,
            candidate_rx,
            best_score,
            stop_flag,
            stats,
            start_time: Instant::now(),
        };
        // On failure the partially built pool is dropped, which stops and joins
        // whatever did spawn.
        pool.handles = Some(pool.spawn_workers(rule, &path, dictionary, candidate_tx)?);

        info!(workers = num_workers, %rule, %path, "search started");
        Ok(pool)
    }

    fn spawn_workers(
        &mut self,
        rule: ScoreRule,
        path: &DerivationPath,
        dictionary: Dictionary,
        candidate_tx: Sender<Candidate>,
    ) -> Result<Vec<JoinHandle<Result<(), EntropyError>>>, SearchError> {
        let mut handles = Vec::with_capacity(self.num_workers);

        for id in 0..self.num_workers {
            let deriver = AccountDeriver::new(dictionary, path.clone());
            let worker = CpuWorker::new(
                id,
                deriver,
                rule,
                self.best_score.clone(),
                candidate_tx.clone(),
                self.stop_flag.clone(),
                self.stats.clone(),
            );
            let stop_flag = self.stop_flag.clone();

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || {
                    let result = worker.run();
                    if let Err(ref e) = result {
                        error!(worker = id, error = %e, "worker failed, stopping search");
                        stop_flag.store(true, Ordering::Relaxed);
                    }
                    result
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.handles = Some(handles);
                    return Err(SearchError::Spawn(e));
                }
            }
        }

        Ok(handles)
    }

    /// Waits for a candidate with timeout.
    ///
    /// Returns `None` on timeout. If every worker has exited the pool is
    /// marked stopped and `None` is returned.
    pub fn wait_for_candidate(&self, timeout: Duration) -> Option<Candidate> {
        match self.candidate_rx.recv_timeout(timeout) {
            Ok(candidate) => Some(candidate),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.stop();
                None
            }
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops and joins all workers, returning the first worker failure.
    pub fn join(mut self) -> Result<(), SearchError> {
        self.join_workers()
    }

    fn join_workers(&mut self) -> Result<(), SearchError> {
        self.stop();
        let mut outcome = Ok(());
        if let Some(handles) = self.handles.take() {
            for (id, handle) in handles.into_iter().enumerate() {
                let result = match handle.join() {
                    Ok(result) => result.map_err(SearchError::from),
                    Err(_) => Err(SearchError::WorkerPanicked(id)),
                };
                if outcome.is_ok() {
                    outcome = result;
                }
            }
        }
        outcome
    }

    /// Returns the threshold shared with workers, for the coordinator.
    pub fn best_score(&self) -> Arc<AtomicU32> {
        self.best_score.clone()
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current evaluation rate (candidates per second).
    pub fn candidates_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.stats.total_evaluated() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Workers blocked on a full channel re-check the stop flag, so this
        // cannot hang.
        let _ = self.join_workers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::Coordinator;

    #[test]
    fn test_pool_feeds_coordinator() {
        let pool = WorkerPool::new(
            2,
            ScoreRule::LeadingZeroNibbles,
            DerivationPath::ETHEREUM,
            Dictionary::english().unwrap(),
        )
        .unwrap();
        let mut coordinator =
            Coordinator::new(ScoreRule::LeadingZeroNibbles, pool.best_score(), pool.start_time());

        // With the threshold at zero the first candidate is always reported.
        let candidate = pool
            .wait_for_candidate(Duration::from_secs(30))
            .expect("no candidate within timeout");
        assert!(coordinator.offer(candidate).is_some());
        assert!(pool.stats().total_reported() >= 1);

        pool.join().unwrap();
    }

    #[test]
    fn test_drop_stops_workers() {
        let pool = WorkerPool::new(
            2,
            ScoreRule::LeadingZeroBytes,
            DerivationPath::ETHEREUM,
            Dictionary::english().unwrap(),
        )
        .unwrap();
        let stop_flag = pool.stop_flag_clone();
        // Nobody drains the channel; drop must still return.
        thread::sleep(Duration::from_millis(100));
        drop(pool);
        assert!(stop_flag.load(Ordering::Relaxed));
    }
}
