//! Cryptographic pipeline from random entropy to a checksummed Ethereum address.
//!
//! This module provides:
//! - Secure entropy acquisition
//! - BIP-39 mnemonic encoding and seed stretching
//! - BIP-32 private key derivation along a fixed path
//! - Ethereum address derivation using Keccak-256

mod address;
mod deriver;
mod entropy;
mod hd;
mod keypair;
mod mnemonic;
mod seed;

use tiny_keccak::{Hasher, Keccak};

pub use address::Address;
pub use deriver::AccountDeriver;
pub use entropy::{Entropy, EntropyError, ENTROPY_LEN};
pub use hd::{ChildNumber, DerivationError, DerivationPath, ExtendedKey, PathError};
pub use keypair::Keypair;
pub use mnemonic::{Dictionary, DictionaryError, Mnemonic, DICTIONARY_LEN, WORD_COUNT};
pub use seed::{derive_seed, Seed, SEED_LEN};

/// Computes the Keccak-256 digest of `data`.
#[inline]
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    hash
}
