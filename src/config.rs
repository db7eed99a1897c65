//! Runtime configuration for the mnemonic vanity search.

use crate::crypto::DerivationPath;
use crate::scoring::ScoreRule;
use clap::Parser;

/// Mnemonic Vanity Address Search
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Score rule: leading-zero-bytes, leading-zero-nibbles, or longest-run
    #[arg(short, long, default_value = "leading-zero-bytes")]
    pub rule: ScoreRule,

    /// Derivation path, e.g. "m/44'/60'/0'/0/0", or a named path (ethereum, bitcoin)
    #[arg(short, long, default_value = "m/44'/60'/0'/0/0")]
    pub path: DerivationPath,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Stop once a candidate reaches this score (default: run forever)
    #[arg(short, long)]
    pub target: Option<u32>,

    /// Progress report interval in seconds
    #[arg(short = 'i', long, default_value = "10")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Returns the stop score, if any. A target of 0 means run forever.
    pub fn target_score(&self) -> Option<u32> {
        self.target.filter(|&t| t > 0)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count() == 0 {
            return Err(ConfigError::NoWorkers);
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        if let Some(target) = self.target_score() {
            let max = self.rule.max_score();
            if target > max {
                return Err(ConfigError::UnreachableTarget {
                    target,
                    max,
                    rule: self.rule,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("At least one worker is required")]
    NoWorkers,

    #[error("Report interval must be at least one second")]
    InvalidInterval,

    #[error("Target score {target} exceeds the maximum of {max} for rule {rule}")]
    UnreachableTarget { target: u32, max: u32, rule: ScoreRule },
}
