//! Mnemonic to seed key stretching (BIP-39 PBKDF2).

use sha2::Sha512;
use unicode_normalization::UnicodeNormalization;

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

const PBKDF2_ROUNDS: u32 = 2048;
const SALT_PREFIX: &str = "mnemonic";

/// A 64-byte BIP-39 seed.
pub type Seed = [u8; SEED_LEN];

/// Stretches a mnemonic phrase into a seed.
///
/// Both the phrase and the passphrase are NFKD-normalized before use.
pub fn derive_seed(phrase: &str, passphrase: &str) -> Seed {
    let password: String = phrase.nfkd().collect();
    let salt: String = SALT_PREFIX.chars().chain(passphrase.nfkd()).collect();

    let mut seed = [0u8; SEED_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut seed,
    );
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_known_seed() {
        let seed = derive_seed(ABANDON_ABOUT, "");
        assert_eq!(
            hex::encode(seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let seed = derive_seed(ABANDON_ABOUT, "TREZOR");
        assert_eq!(
            hex::encode(seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_matches_reference_seed() {
        let mnemonic = bip39::Mnemonic::from_entropy(&[0x5a; 16]).unwrap();
        let phrase = mnemonic.to_string();
        assert_eq!(derive_seed(&phrase, ""), mnemonic.to_seed(""));
    }

    #[test]
    fn test_japanese_vector() {
        // Ideographic spaces and compatibility characters (U+334D) only agree
        // with the published seed after NFKD.
        let phrase = "あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あいこくしん　あおぞら";
        let seed = derive_seed(phrase, "㍍ガバヴァぱばぐゞちぢ十人十色");
        assert_eq!(
            hex::encode(seed),
            "a262d6fb6122ecf45be09c50492b31f92e9beb7d9a845987a02cefda57a15f9c\
             467a17872029a9e92299b5cbdf306e3a0ee620245cbd508959b6cb7ca637bd55"
        );
    }

    #[test]
    fn test_compatibility_characters_decompose() {
        // NFKD maps U+334D to its katakana spelling; NFC would not.
        assert_eq!(derive_seed("", "\u{334d}"), derive_seed("", "メートル"));
    }

    #[test]
    fn test_normalizes_before_stretching() {
        // U+00E9 (composed) and "e" + U+0301 (decomposed) must agree.
        assert_eq!(derive_seed("caf\u{e9}", ""), derive_seed("cafe\u{301}", ""));
    }
}
