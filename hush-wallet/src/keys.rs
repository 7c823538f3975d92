//! The wallet's single derived keypair.
//!
//! Derivation is delegated entirely to `bip39` and `bitcoin::bip32`:
//! seed phrase (empty passphrase) → BIP32 master → `m/86'/0'/0'/0/0`.
//! The seed bytes live only long enough to derive the master key and are
//! zeroized on drop.

use std::str::FromStr;

use bip39::Mnemonic;
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{All, Keypair, PublicKey, Secp256k1, SecretKey, XOnlyPublicKey};
use bitcoin::{Address, Network};
use zeroize::Zeroizing;

use hush_core::constants::{MNEMONIC_WORD_COUNT, WALLET_DERIVATION_PATH};
use hush_core::error::{HushError, Result};

/// The derived keypair of a single-key wallet.
#[derive(Debug)]
pub struct KeyMaterial {
    secp: Secp256k1<All>,
    keypair: Keypair,
}

impl KeyMaterial {
    /// Derives the wallet key from a BIP39 seed phrase.
    ///
    /// The network only selects BIP32 version bytes during derivation; the
    /// resulting keypair is network-independent.
    pub fn from_mnemonic(phrase: &str, network: Network) -> Result<Self> {
        let mnemonic = Mnemonic::parse(phrase)
            .map_err(|e| HushError::KeyDerivation(format!("invalid mnemonic: {e}")))?;
        let seed = Zeroizing::new(mnemonic.to_seed(""));

        let secp = Secp256k1::new();
        let master = Xpriv::new_master(network, seed.as_ref())
            .map_err(|e| HushError::KeyDerivation(format!("master key: {e}")))?;
        let path = DerivationPath::from_str(WALLET_DERIVATION_PATH)
            .map_err(|e| HushError::KeyDerivation(format!("derivation path: {e}")))?;
        let child = master
            .derive_priv(&secp, &path)
            .map_err(|e| HushError::KeyDerivation(format!("child key: {e}")))?;

        let keypair = Keypair::from_secret_key(&secp, &child.private_key);
        Ok(Self { secp, keypair })
    }

    /// Generates a fresh 12-word seed phrase.
    pub fn generate_mnemonic() -> Result<String> {
        let mnemonic = Mnemonic::generate(MNEMONIC_WORD_COUNT)
            .map_err(|e| HushError::KeyDerivation(format!("mnemonic generation: {e}")))?;
        Ok(mnemonic.to_string())
    }

    /// The wallet secret key.
    pub fn secret_key(&self) -> SecretKey {
        self.keypair.secret_key()
    }

    /// The full public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// The x-only public key.
    pub fn x_only(&self) -> XOnlyPublicKey {
        self.keypair.x_only_public_key().0
    }

    /// The wallet's plain Taproot receiving address on the given network.
    pub fn p2tr_address(&self, network: Network) -> Result<Address> {
        let output = hush_crypto::output_key(&self.secp, &self.x_only())?;
        Ok(hush_crypto::taproot::address(output, network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP86 test vector mnemonic.
    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derives_bip86_first_address() {
        let keys = KeyMaterial::from_mnemonic(PHRASE, Network::Bitcoin).unwrap();
        assert_eq!(
            keys.p2tr_address(Network::Bitcoin).unwrap().to_string(),
            "bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = KeyMaterial::from_mnemonic(PHRASE, Network::Bitcoin).unwrap();
        let b = KeyMaterial::from_mnemonic(PHRASE, Network::Bitcoin).unwrap();
        assert_eq!(a.x_only(), b.x_only());
        assert_eq!(a.secret_key(), b.secret_key());
    }

    #[test]
    fn invalid_mnemonic_is_rejected() {
        let err = KeyMaterial::from_mnemonic("not a real seed phrase", Network::Bitcoin)
            .unwrap_err();
        assert!(matches!(err, HushError::KeyDerivation(_)));
    }

    #[test]
    fn generated_mnemonic_has_twelve_words_and_parses() {
        let phrase = KeyMaterial::generate_mnemonic().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
        KeyMaterial::from_mnemonic(&phrase, Network::Testnet).unwrap();
    }

    #[test]
    fn distinct_mnemonics_give_distinct_keys() {
        let a = KeyMaterial::generate_mnemonic().unwrap();
        let b = KeyMaterial::generate_mnemonic().unwrap();
        assert_ne!(a, b);
    }
}
