//! # mnemonic_vanity
//!
//! Searches random BIP-39 mnemonics for vanity Ethereum addresses.
//!
//! ## Architecture
//!
//! - `crypto`: Entropy, mnemonic encoding, seed stretching, HD derivation, addresses
//! - `scoring`: Vanity scoring rules
//! - `worker`: Parallel search workers and the best-score coordinator
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod scoring;
pub mod worker;

pub use config::Config;
pub use crypto::{AccountDeriver, Address, DerivationPath, Dictionary, Entropy, Keypair, Mnemonic};
pub use scoring::ScoreRule;
pub use worker::{Candidate, Coordinator, Improvement, SearchError, WorkerPool};
