//! The full entropy to address pipeline for one candidate.

use secp256k1::{All, Secp256k1};

use super::{
    derive_seed, DerivationError, DerivationPath, Dictionary, Entropy, Keypair, Mnemonic,
};

/// Derives the account at a fixed path for freshly encoded mnemonics.
///
/// Owns its own secp256k1 context, so each worker should hold one.
pub struct AccountDeriver {
    secp: Secp256k1<All>,
    dictionary: Dictionary,
    path: DerivationPath,
}

impl AccountDeriver {
    pub fn new(dictionary: Dictionary, path: DerivationPath) -> Self {
        Self {
            secp: Secp256k1::new(),
            dictionary,
            path,
        }
    }

    /// entropy -> mnemonic -> seed -> key at `path` -> address.
    ///
    /// The passphrase is always empty.
    pub fn derive(&self, entropy: &Entropy) -> Result<(Mnemonic, Keypair), DerivationError> {
        let mnemonic = self.dictionary.encode(entropy);
        let seed = derive_seed(mnemonic.phrase(), "");
        let secret_key = self.path.derive_secret_key(&self.secp, &seed)?;
        Ok((mnemonic, Keypair::from_secret_key(&self.secp, secret_key)))
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_disagree() {
        let entropy = Entropy::from_bytes([0u8; 16]);
        let dict = Dictionary::english().unwrap();

        let (_, eth) = AccountDeriver::new(dict, DerivationPath::ETHEREUM)
            .derive(&entropy)
            .unwrap();
        let (_, btc) = AccountDeriver::new(dict, DerivationPath::BITCOIN_COIN_TYPE)
            .derive(&entropy)
            .unwrap();

        assert_eq!(eth.address().to_hex(), "9858effd232b4033e47d90003d41ec34ecaeda94");
        assert_ne!(eth.address(), btc.address());
    }
}
