//! BIP-39 mnemonic encoding (encode direction only).

use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

use super::Entropy;

/// Words in a mnemonic built from 128 bits of entropy.
pub const WORD_COUNT: usize = 12;

/// Entries a dictionary must hold so that every 11-bit group has a word.
pub const DICTIONARY_LEN: usize = 2048;

const INDEX_MASK: u32 = (1 << 11) - 1;

/// Errors raised while validating a word list.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("dictionary must contain 2048 words, found {0}")]
    WrongSize(usize),

    #[error("dictionary word {0:?} appears more than once")]
    Duplicate(&'static str),

    #[error("dictionary word at index {0} is empty or contains whitespace")]
    Malformed(usize),
}

/// A validated, index-addressable list of 2048 words.
#[derive(Debug, Clone, Copy)]
pub struct Dictionary {
    words: &'static [&'static str],
}

impl Dictionary {
    /// Validates `words` as a mnemonic dictionary.
    pub fn new(words: &'static [&'static str]) -> Result<Self, DictionaryError> {
        if words.len() != DICTIONARY_LEN {
            return Err(DictionaryError::WrongSize(words.len()));
        }

        let mut seen = HashSet::with_capacity(DICTIONARY_LEN);
        for (i, &word) in words.iter().enumerate() {
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(DictionaryError::Malformed(i));
            }
            if !seen.insert(word) {
                return Err(DictionaryError::Duplicate(word));
            }
        }

        Ok(Self { words })
    }

    /// The standard BIP-39 English word list.
    pub fn english() -> Result<Self, DictionaryError> {
        Self::new(bip39::Language::English.word_list())
    }

    /// Returns the word for an 11-bit index.
    #[inline]
    pub fn word(&self, index: u16) -> &'static str {
        self.words[index as usize & INDEX_MASK as usize]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word)
    }

    /// Encodes entropy as a 12-word mnemonic.
    ///
    /// The checksum nibble is the top four bits of SHA-256(entropy). The 132-bit
    /// stream (entropy followed by the nibble) is split MSB-first into 11-bit
    /// groups; the low nibble of the checksum byte is never consumed.
    pub fn encode(&self, entropy: &Entropy) -> Mnemonic {
        let checksum = Sha256::digest(entropy.as_bytes())[0] & 0xf0;

        let mut words = [""; WORD_COUNT];
        let mut filled = 0;
        let mut acc: u32 = 0;
        let mut bits: u32 = 0;

        for &byte in entropy.as_bytes().iter().chain(std::iter::once(&checksum)) {
            acc = (acc << 8) | u32::from(byte);
            bits += 8;
            // bits < 11 on entry, so at most one group completes per byte
            if bits >= 11 {
                bits -= 11;
                words[filled] = self.word(((acc >> bits) & INDEX_MASK) as u16);
                filled += 1;
                acc &= (1 << bits) - 1;
            }
        }
        debug_assert_eq!(filled, WORD_COUNT);

        Mnemonic {
            phrase: words.join(" "),
        }
    }
}

/// A space-separated mnemonic phrase.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: String,
}

impl Mnemonic {
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase.split(' ')
    }

    pub fn into_phrase(self) -> String {
        self.phrase
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mnemonic(..)")
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase)
    }
}
