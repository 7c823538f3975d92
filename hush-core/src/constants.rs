//! Protocol constants for hush.
//!
//! Sizes follow BIP340/BIP341 (x-only keys, Taproot outputs); the
//! silent-payment address layout follows the version-0 scheme with no
//! separate scanning key.

// ═══════════════════════════════════════════════════════════════════════════════
// KEY AND SCRIPT SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a compressed secp256k1 public key in bytes (parity byte + x).
pub const COMPRESSED_KEY_SIZE: usize = 33;

/// Size of an x-only public key in bytes (BIP340).
pub const X_ONLY_KEY_SIZE: usize = 32;

/// Size of a witness-v1 Taproot output script: `OP_1 PUSH_32 <key>`.
pub const P2TR_SCRIPT_SIZE: usize = 34;

// ═══════════════════════════════════════════════════════════════════════════════
// SILENT-PAYMENT ADDRESS ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Version byte of the silent-payment address payload.
///
/// Version 0 means "no separate scanning key, no address reuse protection".
/// Decoding any other version is an error.
pub const SILENT_ADDRESS_VERSION: u8 = 0;

/// Length of the address payload: 1 version byte + 32 x-only key bytes.
pub const SILENT_PAYLOAD_SIZE: usize = 1 + X_ONLY_KEY_SIZE;

/// Default human-readable prefix for mainnet silent-payment addresses.
///
/// The prefix is an explicit configuration parameter everywhere it is
/// consumed; these are only the defaults offered by the CLI.
pub const DEFAULT_HRP_MAINNET: &str = "sp";

/// Default human-readable prefix for testnet/signet silent-payment addresses.
pub const DEFAULT_HRP_TESTNET: &str = "tsp";

// ═══════════════════════════════════════════════════════════════════════════════
// TWEAK DOMAIN
// ═══════════════════════════════════════════════════════════════════════════════

/// Tag for the BIP341 output-key commitment hash.
pub const TAP_TWEAK_TAG: &str = "TapTweak";

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET
// ═══════════════════════════════════════════════════════════════════════════════

/// BIP86 derivation path of the wallet's single key.
pub const WALLET_DERIVATION_PATH: &str = "m/86'/0'/0'/0/0";

/// Taproot activation height, the earliest useful birthday for a restored
/// wallet (no silent payment can exist before it).
pub const TAPROOT_ACTIVATION_HEIGHT: u64 = 709_632;

/// Number of words in a generated mnemonic.
pub const MNEMONIC_WORD_COUNT: usize = 12;

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default number of fully-processed blocks between cursor checkpoints.
///
/// Checkpointing after every block keeps a crashed scan re-scannable from
/// the last completed height instead of the start of the whole range.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_version_plus_xonly() {
        assert_eq!(SILENT_PAYLOAD_SIZE, 33);
        assert_eq!(SILENT_PAYLOAD_SIZE, 1 + X_ONLY_KEY_SIZE);
    }

    #[test]
    fn network_prefixes_differ() {
        assert_ne!(DEFAULT_HRP_MAINNET, DEFAULT_HRP_TESTNET);
    }

    #[test]
    fn derivation_path_parses() {
        use std::str::FromStr;
        bitcoin::bip32::DerivationPath::from_str(WALLET_DERIVATION_PATH).unwrap();
    }
}
