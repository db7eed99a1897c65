//! Secret key to Ethereum address.

use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};

use super::{keccak256, Address};

/// The Ethereum address controlled by a derived private key.
///
/// The secret itself is not retained; a candidate is reported by its phrase.
#[derive(Debug, Clone)]
pub struct Keypair {
    address: Address,
}

impl Keypair {
    /// Computes the address for an existing secret key.
    #[inline]
    pub fn from_secret_key<C: Signing>(secp: &Secp256k1<C>, secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(secp, &secret_key);
        Self {
            address: Self::derive_address(&public_key),
        }
    }

    /// Like [`Keypair::from_secret_key`] but from raw big-endian bytes.
    pub fn from_secret_bytes<C: Signing>(
        secp: &Secp256k1<C>,
        secret_bytes: [u8; 32],
    ) -> Result<Self, secp256k1::Error> {
        let secret_key = SecretKey::from_slice(&secret_bytes)?;
        Ok(Self::from_secret_key(secp, secret_key))
    }

    /// Keccak-256 over the 64-byte uncompressed point (0x04 prefix dropped),
    /// keeping the last 20 bytes.
    #[inline]
    fn derive_address(public_key: &PublicKey) -> Address {
        let hash = keccak256(&public_key.serialize_uncompressed()[1..]);

        let mut address_bytes = [0u8; 20];
        address_bytes.copy_from_slice(&hash[12..]);
        Address::from_bytes(address_bytes)
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_key_one() {
        let secp = Secp256k1::new();
        let mut secret_bytes = [0u8; 32];
        secret_bytes[31] = 1;
        let keypair = Keypair::from_secret_bytes(&secp, secret_bytes).unwrap();

        assert_eq!(
            keypair.address().to_hex(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_abandon_account_zero() {
        let secp = Secp256k1::new();
        let secret_bytes: [u8; 32] =
            hex::decode("1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727")
                .unwrap()
                .try_into()
                .unwrap();
        let keypair = Keypair::from_secret_bytes(&secp, secret_bytes).unwrap();

        assert_eq!(
            keypair.address().to_hex(),
            "9858effd232b4033e47d90003d41ec34ecaeda94"
        );
    }

    #[test]
    fn test_rejects_zero_key() {
        let secp = Secp256k1::new();
        assert!(Keypair::from_secret_bytes(&secp, [0u8; 32]).is_err());
    }
}
