//! Secure random entropy for mnemonic generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of entropy bytes behind a 12-word mnemonic.
pub const ENTROPY_LEN: usize = 16;

/// Returned when the operating system RNG cannot be read.
#[derive(Debug, thiserror::Error)]
#[error("secure random generator unavailable: {0}")]
pub struct EntropyError(#[from] rand::Error);

/// 128 bits of entropy, the root of one candidate.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entropy([u8; ENTROPY_LEN]);

impl Entropy {
    /// Draws fresh entropy from the operating system RNG.
    #[inline]
    pub fn generate() -> Result<Self, EntropyError> {
        let mut bytes = [0u8; ENTROPY_LEN];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Wraps caller-provided bytes. Used for fixed vectors.
    pub const fn from_bytes(bytes: [u8; ENTROPY_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ENTROPY_LEN] {
        &self.0
    }
}

// Entropy is secret material; never print it.
impl std::fmt::Debug for Entropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Entropy(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_draws_distinct_values() {
        let a = Entropy::generate().unwrap();
        let b = Entropy::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_hides_bytes() {
        let entropy = Entropy::from_bytes([0xab; ENTROPY_LEN]);
        assert_eq!(format!("{:?}", entropy), "Entropy(..)");
    }
}
