//! Best-record ownership and the shared score threshold.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::crypto::Address;
use crate::scoring::ScoreRule;

use super::Candidate;

/// The best candidate seen so far.
#[derive(Debug, Clone, Default)]
pub struct BestState {
    /// Highest confirmed score; never decreases
    pub score: u32,
    /// Phrase of the most recent candidate at `score`
    pub phrase: String,
    /// Address of the most recent candidate at `score`
    pub address: Option<Address>,
    /// Run time at which `score` was first reached
    pub time_to_find: Duration,
}

/// An accepted candidate, ready to report.
#[derive(Debug, Clone)]
pub struct Improvement {
    pub score: u32,
    /// Checksummed address with 0x prefix
    pub address: String,
    pub phrase: String,
    pub worker_id: usize,
    /// Run time when the candidate was accepted
    pub elapsed: Duration,
    /// Expected wait for the next strict improvement
    pub estimated_next: Option<Duration>,
    /// False when the candidate only tied the best score
    pub strict: bool,
}

/// Sole writer of [`BestState`] and of the threshold workers read.
pub struct Coordinator {
    rule: ScoreRule,
    best: BestState,
    shared_best: Arc<AtomicU32>,
    start_time: Instant,
}

impl Coordinator {
    pub fn new(rule: ScoreRule, shared_best: Arc<AtomicU32>, start_time: Instant) -> Self {
        Self {
            rule,
            best: BestState::default(),
            shared_best,
            start_time,
        }
    }

    /// Offers a worker's candidate.
    ///
    /// Candidates below the recorded best are stale and dropped. Ties replace
    /// the displayed phrase and address; only strict improvements raise the
    /// shared threshold.
    pub fn offer(&mut self, candidate: Candidate) -> Option<Improvement> {
        if candidate.score < self.best.score {
            trace!(
                worker = candidate.worker_id,
                score = candidate.score,
                best = self.best.score,
                "dropping stale report"
            );
            return None;
        }

        let elapsed = self.start_time.elapsed();
        let strict = candidate.score > self.best.score;
        if strict {
            self.best.score = candidate.score;
            self.best.time_to_find = elapsed;
            self.shared_best.fetch_max(candidate.score, Ordering::AcqRel);
        }
        self.best.phrase.clone_from(&candidate.phrase);
        self.best.address = Some(candidate.address);

        Some(Improvement {
            score: candidate.score,
            address: candidate.address.to_checksum_prefixed(),
            phrase: candidate.phrase,
            worker_id: candidate.worker_id,
            elapsed,
            estimated_next: self.estimated_time_to_next(),
            strict,
        })
    }

    /// Estimates the wait for the next strict improvement.
    ///
    /// Reaching score `s` took `time_to_find`; score `s + 1` needs `base` times
    /// the search space. `None` until the first nonzero score.
    pub fn estimated_time_to_next(&self) -> Option<Duration> {
        if self.best.score == 0 {
            return None;
        }
        self.best
            .time_to_find
            .checked_mul(self.rule.difficulty_base())
    }

    pub fn best(&self) -> &BestState {
        &self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    use crossbeam_channel::bounded;
    use rand::Rng;
    use rayon::prelude::*;

    fn candidate(score: u32, worker_id: usize) -> Candidate {
        let mut bytes = [0xab; 20];
        bytes[0] = score as u8;
        Candidate {
            phrase: format!("phrase {}", score),
            address: Address::from_bytes(bytes),
            score,
            worker_id,
        }
    }

    fn make_coordinator() -> (Coordinator, Arc<AtomicU32>) {
        let shared = Arc::new(AtomicU32::new(0));
        let coordinator =
            Coordinator::new(ScoreRule::LeadingZeroBytes, shared.clone(), Instant::now());
        (coordinator, shared)
    }

    #[test]
    fn test_strict_improvement_raises_threshold() {
        let (mut coordinator, shared) = make_coordinator();

        let update = coordinator.offer(candidate(2, 0)).unwrap();
        assert!(update.strict);
        assert_eq!(shared.load(Ordering::Acquire), 2);
        assert_eq!(coordinator.best().score, 2);
        assert!(update.address.starts_with("0x"));
    }

    #[test]
    fn test_tie_overwrites_display_only() {
        let (mut coordinator, shared) = make_coordinator();
        coordinator.offer(candidate(3, 0)).unwrap();
        let found_at = coordinator.best().time_to_find;

        let mut tie = candidate(3, 1);
        tie.phrase = "later phrase".into();
        let update = coordinator.offer(tie).unwrap();

        assert!(!update.strict);
        assert_eq!(coordinator.best().phrase, "later phrase");
        assert_eq!(coordinator.best().time_to_find, found_at);
        assert_eq!(shared.load(Ordering::Acquire), 3);
    }

    #[test]
    fn test_stale_report_is_dropped() {
        let (mut coordinator, shared) = make_coordinator();
        coordinator.offer(candidate(4, 0)).unwrap();

        assert!(coordinator.offer(candidate(1, 1)).is_none());
        assert_eq!(coordinator.best().score, 4);
        assert_eq!(coordinator.best().phrase, "phrase 4");
        assert_eq!(shared.load(Ordering::Acquire), 4);
    }

    #[test]
    fn test_zero_score_tie_has_no_estimate() {
        let (mut coordinator, _) = make_coordinator();
        let update = coordinator.offer(candidate(0, 0)).unwrap();
        assert!(!update.strict);
        assert_eq!(update.estimated_next, None);
    }

    #[test]
    fn test_estimate_scales_by_base() {
        let shared = Arc::new(AtomicU32::new(0));
        let start = Instant::now() - Duration::from_secs(2);
        let mut coordinator = Coordinator::new(ScoreRule::LeadingZeroNibbles, shared, start);

        let update = coordinator.offer(candidate(1, 0)).unwrap();
        let estimate = update.estimated_next.unwrap();
        assert_eq!(estimate, coordinator.best().time_to_find * 16);
        assert!(estimate >= Duration::from_secs(32));
    }

    #[test]
    fn test_best_score_is_monotonic_under_concurrent_reports() {
        let (mut coordinator, shared) = make_coordinator();
        let (tx, rx) = bounded::<Candidate>(16);
        let done = Arc::new(AtomicBool::new(false));

        thread::scope(|s| {
            // Simulated workers with random scores, gated on the live threshold.
            let producer_shared = shared.clone();
            s.spawn(move || {
                (0..8usize).into_par_iter().for_each(|worker_id| {
                    let mut rng = rand::thread_rng();
                    for _ in 0..500 {
                        let score = rng.gen_range(0..=20);
                        if score >= producer_shared.load(Ordering::Acquire) {
                            tx.send(candidate(score, worker_id)).unwrap();
                        }
                    }
                });
            });

            // Observer sampling the threshold while reports are in flight.
            let observer_shared = shared.clone();
            let observer_done = done.clone();
            s.spawn(move || {
                let mut last = 0;
                while !observer_done.load(Ordering::Acquire) {
                    let now = observer_shared.load(Ordering::Acquire);
                    assert!(now >= last);
                    last = now;
                }
            });

            let mut last_best = 0;
            for report in rx.iter() {
                let reported = report.score;
                if let Some(update) = coordinator.offer(report) {
                    assert!(update.score >= last_best);
                }
                assert_eq!(coordinator.best().score, reported.max(last_best));
                last_best = coordinator.best().score;
                assert_eq!(shared.load(Ordering::Acquire), last_best);
            }
            done.store(true, Ordering::Release);
        });
    }
}
