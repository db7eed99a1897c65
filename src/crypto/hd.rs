//! BIP-32 private key derivation along a fixed path.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

const MASTER_KEY: &[u8] = b"Bitcoin seed";
const HARDENED_BIT: u32 = 0x8000_0000;

/// Errors raised while walking a derivation path.
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    #[error("master key derived from seed is out of range")]
    InvalidMaster,

    #[error("child {child} at depth {depth} is out of range")]
    InvalidChild { depth: usize, child: ChildNumber },

    #[error("HMAC rejected the key length")]
    HmacKey,
}

/// Errors raised while parsing a derivation path string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("derivation path must start with \"m\"")]
    MissingMaster,

    #[error("derivation path has no components")]
    Empty,

    #[error("invalid path component {0:?}")]
    InvalidComponent(String),

    #[error("path index {0} does not fit in 31 bits")]
    IndexOutOfRange(u32),
}

/// One step of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildNumber {
    index: u32,
    hardened: bool,
}

impl ChildNumber {
    pub const fn hardened(index: u32) -> Self {
        Self {
            index,
            hardened: true,
        }
    }

    pub const fn normal(index: u32) -> Self {
        Self {
            index,
            hardened: false,
        }
    }

    pub const fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// The 32-bit value hashed into the child HMAC.
    #[inline]
    pub const fn raw(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_BIT
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl FromStr for ChildNumber {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(|c: char| matches!(c, '\'' | 'h' | 'H')) {
            Some(digits) => (digits, true),
            None => (s, false),
        };

        let index: u32 = digits
            .parse()
            .map_err(|_| PathError::InvalidComponent(s.to_string()))?;
        if index & HARDENED_BIT != 0 {
            return Err(PathError::IndexOutOfRange(index));
        }

        Ok(Self { index, hardened })
    }
}

const ETHEREUM_CHILDREN: [ChildNumber; 5] = [
    ChildNumber::hardened(44),
    ChildNumber::hardened(60),
    ChildNumber::hardened(0),
    ChildNumber::normal(0),
    ChildNumber::normal(0),
];

const BITCOIN_CHILDREN: [ChildNumber; 5] = [
    ChildNumber::hardened(44),
    ChildNumber::hardened(0),
    ChildNumber::hardened(0),
    ChildNumber::normal(0),
    ChildNumber::normal(0),
];

/// An ordered list of child steps from the master key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Cow<'static, [ChildNumber]>);

impl DerivationPath {
    /// `m/44'/60'/0'/0/0`, the first Ethereum account.
    pub const ETHEREUM: Self = Self(Cow::Borrowed(&ETHEREUM_CHILDREN));

    /// `m/44'/0'/0'/0/0`, the Bitcoin coin type.
    pub const BITCOIN_COIN_TYPE: Self = Self(Cow::Borrowed(&BITCOIN_CHILDREN));

    pub fn new(children: Vec<ChildNumber>) -> Self {
        Self(Cow::Owned(children))
    }

    pub fn children(&self) -> &[ChildNumber] {
        &self.0
    }

    /// Walks this path from `seed` and returns the final private key.
    ///
    /// Intermediate chain codes are dropped as the walk proceeds.
    pub fn derive_secret_key<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        seed: &[u8],
    ) -> Result<SecretKey, DerivationError> {
        let mut key = ExtendedKey::master(seed)?;
        for (depth, &child) in self.0.iter().enumerate() {
            key = key.derive_child(secp, child, depth + 1)?;
        }
        Ok(key.secret_key())
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::ETHEREUM
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in self.0.iter() {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" | "eth" => return Ok(Self::ETHEREUM),
            "bitcoin" | "btc" => return Ok(Self::BITCOIN_COIN_TYPE),
            _ => {}
        }

        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(PathError::MissingMaster);
        }

        let children = parts
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if children.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self::new(children))
    }
}

/// A private key paired with its chain code.
#[derive(Clone)]
pub struct ExtendedKey {
    secret_key: SecretKey,
    chain_code: [u8; 32],
}

impl ExtendedKey {
    /// Derives the master key: HMAC-SHA512 keyed with "Bitcoin seed".
    pub fn master(seed: &[u8]) -> Result<Self, DerivationError> {
        let mut mac =
            HmacSha512::new_from_slice(MASTER_KEY).map_err(|_| DerivationError::HmacKey)?;
        mac.update(seed);
        let (il, ir) = split_output(mac);

        let secret_key = SecretKey::from_slice(&il).map_err(|_| DerivationError::InvalidMaster)?;
        Ok(Self {
            secret_key,
            chain_code: ir,
        })
    }

    /// Derives the child key for `child`. `depth` only labels errors.
    ///
    /// Hardened steps hash `0x00 || k || index`, normal steps hash
    /// `compressed(k*G) || index`; the child key is `(k + Il) mod n`.
    pub fn derive_child<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        child: ChildNumber,
        depth: usize,
    ) -> Result<Self, DerivationError> {
        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|_| DerivationError::HmacKey)?;
        if child.is_hardened() {
            mac.update(&[0]);
            mac.update(&self.secret_key.secret_bytes());
        } else {
            mac.update(&PublicKey::from_secret_key(secp, &self.secret_key).serialize());
        }
        mac.update(&child.raw().to_be_bytes());
        let (il, ir) = split_output(mac);

        let secret_key = tweak_secret_key(self.secret_key, il)
            .ok_or(DerivationError::InvalidChild { depth, child })?;

        Ok(Self {
            secret_key,
            chain_code: ir,
        })
    }

    pub fn secret_key(&self) -> SecretKey {
        self.secret_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtendedKey(..)")
    }
}

/// Computes `(parent + il) mod n`. `None` when `il >= n` or the sum is zero.
fn tweak_secret_key(parent: SecretKey, il: [u8; 32]) -> Option<SecretKey> {
    let tweak = Scalar::from_be_bytes(il).ok()?;
    parent.add_tweak(&tweak).ok()
}

fn split_output(mac: HmacSha512) -> ([u8; 32], [u8; 32]) {
    let output = mac.finalize().into_bytes();
    let mut il = [0u8; 32];
    let mut ir = [0u8; 32];
    il.copy_from_slice(&output[..32]);
    ir.copy_from_slice(&output[32..]);
    (il, ir)
}
