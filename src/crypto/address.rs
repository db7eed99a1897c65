//! Ethereum address representation and EIP-55 checksum casing.

use std::fmt;

use super::keccak256;

/// An Ethereum address (20 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    #[inline]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the address as 40 lowercase hex characters (no 0x prefix).
    ///
    /// This is the canonical form used for scoring and equality.
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the EIP-55 mixed-case form (no 0x prefix).
    ///
    /// A letter at position `i` is upper-cased when nibble `i` of
    /// Keccak-256(lowercase hex) is 8 or more. Digits are left alone.
    pub fn to_checksum(&self) -> String {
        let hex_addr = self.to_hex();
        let hash = keccak256(hex_addr.as_bytes());

        hex_addr
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let hash_byte = hash[i / 2];
                let nibble = if i % 2 == 0 {
                    hash_byte >> 4
                } else {
                    hash_byte & 0x0f
                };

                if nibble >= 8 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }

    /// Returns the checksummed address with a 0x prefix.
    pub fn to_checksum_prefixed(&self) -> String {
        format!("0x{}", self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum_prefixed())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum_prefixed())
    }
}
