//! Key-spend-only Taproot outputs (BIP341).
//!
//! The wallet only ever commits to an empty script tree, so the output key
//! is the internal key tweaked by `taggedHash("TapTweak", x)`.

use bitcoin::key::TweakedPublicKey;
use bitcoin::secp256k1::{PublicKey, Secp256k1, Verification, XOnlyPublicKey};
use bitcoin::{Address, Network, Script, ScriptBuf};

use hush_core::constants::{P2TR_SCRIPT_SIZE, TAP_TWEAK_TAG};
use hush_core::error::Result;

use crate::hash::tagged_hash;
use crate::tweak::tweak_add;

/// Computes the BIP341 output key for a key-spend-only commitment.
///
/// Fails with [`hush_core::HushError::InvalidTweak`] if the tweak addition
/// yields the point at infinity. Probability ~2^-128, still handled.
pub fn output_key<C: Verification>(
    secp: &Secp256k1<C>,
    internal: &XOnlyPublicKey,
) -> Result<XOnlyPublicKey> {
    let commit = tagged_hash(TAP_TWEAK_TAG, &internal.serialize());
    tweak_add(secp, internal, &commit)
}

/// Computes the witness-v1 key-spend output script for a public key.
///
/// This single implementation serves both the wallet's own receiving
/// address and any script comparison during scanning.
pub fn key_spend_script<C: Verification>(
    secp: &Secp256k1<C>,
    public_key: &PublicKey,
) -> Result<ScriptBuf> {
    let (internal, _parity) = public_key.x_only_public_key();
    let output = output_key(secp, &internal)?;
    Ok(ScriptBuf::new_p2tr_tweaked(
        TweakedPublicKey::dangerous_assume_tweaked(output),
    ))
}

/// Extracts the embedded x-only key from a witness-v1 Taproot script.
///
/// Returns `None` when the script is not `OP_1 PUSH_32 <key>` or the
/// 32 bytes are not a valid x coordinate.
pub fn p2tr_output_key(script: &Script) -> Option<XOnlyPublicKey> {
    if !script.is_p2tr() {
        return None;
    }
    let bytes = script.as_bytes();
    debug_assert_eq!(bytes.len(), P2TR_SCRIPT_SIZE);
    XOnlyPublicKey::from_slice(&bytes[2..]).ok()
}

/// Converts an already-tweaked output key into an address.
///
/// The network is an explicit parameter; callers decide the encoding, the
/// conversion never consults ambient state.
pub fn address(output: XOnlyPublicKey, network: Network) -> Address {
    Address::p2tr_tweaked(TweakedPublicKey::dangerous_assume_tweaked(output), network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::SecretKey;

    fn test_key(secp: &Secp256k1<bitcoin::secp256k1::All>) -> PublicKey {
        SecretKey::from_slice(&[0x17; 32]).unwrap().public_key(secp)
    }

    #[test]
    fn script_shape_is_witness_v1() {
        let secp = Secp256k1::new();
        let script = key_spend_script(&secp, &test_key(&secp)).unwrap();
        let bytes = script.as_bytes();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], 0x51);
        assert_eq!(bytes[1], 0x20);
        assert!(script.is_p2tr());
    }

    #[test]
    fn matches_bitcoin_crate_tweak() {
        // Cross-check our tagged-hash + tweak-add path against the bitcoin
        // crate's own BIP341 computation with an empty script tree.
        let secp = Secp256k1::new();
        let pk = test_key(&secp);
        let (internal, _) = pk.x_only_public_key();

        let ours = key_spend_script(&secp, &pk).unwrap();
        let theirs = ScriptBuf::new_p2tr(&secp, internal, None);
        assert_eq!(ours, theirs);
    }

    #[test]
    fn output_key_roundtrips_through_script() {
        let secp = Secp256k1::new();
        let pk = test_key(&secp);
        let (internal, _) = pk.x_only_public_key();

        let out = output_key(&secp, &internal).unwrap();
        let script = key_spend_script(&secp, &pk).unwrap();
        assert_eq!(p2tr_output_key(&script), Some(out));
    }

    #[test]
    fn non_taproot_script_has_no_output_key() {
        let script = ScriptBuf::new_op_return([0u8; 4]);
        assert!(p2tr_output_key(&script).is_none());
    }

    #[test]
    fn address_network_is_explicit() {
        let secp = Secp256k1::new();
        let (internal, _) = test_key(&secp).x_only_public_key();
        let out = output_key(&secp, &internal).unwrap();

        let mainnet = address(out, Network::Bitcoin).to_string();
        let testnet = address(out, Network::Testnet).to_string();
        assert!(mainnet.starts_with("bc1p"));
        assert!(testnet.starts_with("tb1p"));
    }
}
