//! Sender-side silent-payment construction.
//!
//! Decodes the receiver's published address and derives the one-time
//! output the sender should fund. At the end of the day this is always a
//! plain Taproot output; only the key inside it is special.

use bitcoin::key::TweakedPublicKey;
use bitcoin::secp256k1::{SecretKey, XOnlyPublicKey};
use bitcoin::ScriptBuf;

use hush_core::error::Result;
use hush_crypto::TweakEngine;

use crate::address::AddressCodec;

/// A one-time output constructed for a silent payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SilentPayment {
    /// The tweaked output key, unique to this (sender input, receiver) pair.
    pub output_key: XOnlyPublicKey,
    /// The witness-v1 output script embedding it.
    pub script: ScriptBuf,
}

/// Builds the output for paying `address` from the Taproot input
/// controlled by `sender_input_sk`.
///
/// The first input of the funding transaction must be the one this key
/// controls; that is what the receiver's scanner will tweak against.
pub fn create_payment(
    codec: &AddressCodec,
    address: &str,
    sender_input_sk: &SecretKey,
) -> Result<SilentPayment> {
    let receiver_spend = codec.decode(address)?;

    let engine = TweakEngine::new();
    let output_key = engine.sender_output_key(&receiver_spend, sender_input_sk)?;

    let script = ScriptBuf::new_p2tr_tweaked(TweakedPublicKey::dangerous_assume_tweaked(
        output_key,
    ));

    Ok(SilentPayment { output_key, script })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::rand::thread_rng;
    use bitcoin::secp256k1::Secp256k1;
    use hush_crypto::p2tr_output_key;

    #[test]
    fn payment_script_embeds_derived_key() {
        let secp = Secp256k1::new();
        let receiver_sk = SecretKey::new(&mut thread_rng());
        let sender_sk = SecretKey::new(&mut thread_rng());

        let codec = AddressCodec::from_prefix("sp").unwrap();
        let address = codec.encode(&receiver_sk.public_key(&secp)).unwrap();

        let payment = create_payment(&codec, &address, &sender_sk).unwrap();
        assert!(payment.script.is_p2tr());
        assert_eq!(p2tr_output_key(&payment.script), Some(payment.output_key));
    }

    #[test]
    fn receiver_recognizes_sender_output() {
        let secp = Secp256k1::new();
        let receiver_sk = SecretKey::new(&mut thread_rng());
        let sender_sk = SecretKey::new(&mut thread_rng());
        let (sender_x, _) = sender_sk.public_key(&secp).x_only_public_key();

        let codec = AddressCodec::from_prefix("sp").unwrap();
        let address = codec.encode(&receiver_sk.public_key(&secp)).unwrap();
        let payment = create_payment(&codec, &address, &sender_sk).unwrap();

        let engine = TweakEngine::new();
        let expected = engine.expected_output_key(&receiver_sk, &sender_x).unwrap();
        assert_eq!(payment.output_key, expected);
    }

    #[test]
    fn malformed_address_is_surfaced() {
        let sender_sk = SecretKey::new(&mut thread_rng());
        let codec = AddressCodec::from_prefix("sp").unwrap();
        assert!(create_payment(&codec, "sp1notanaddress", &sender_sk).is_err());
    }
}
