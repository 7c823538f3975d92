//! The silent-payment tweak derivation.
//!
//! Receiver side, given the candidate transaction's first-input key
//! `P_sender` and the receiver's private key `d`:
//!
//! ```text
//! S  = P_sender * d          (ECDH; only x(S) is carried forward)
//! t  = SHA256(x(S))
//! X  = x(d * G)
//! X' = X + t*G               (x-only tweak-add)
//! ```
//!
//! A transaction output matches when its embedded x-only key equals `X'`
//! byte for byte. The sender derives the same `X'` from the receiver's
//! published spend key and the sender's own input private key, with no
//! interaction; that symmetry is the protocol.

use bitcoin::secp256k1::{
    All, Parity, PublicKey, Scalar, Secp256k1, SecretKey, Verification, XOnlyPublicKey,
};

use hush_core::error::{HushError, Result};

use crate::hash::sha256;

/// Adds `tweak * G` to an x-only point, returning the x-only sum.
///
/// This is the one tweak-add used by both the Taproot output computation
/// and the silent-payment derivation. Fails with
/// [`HushError::InvalidTweak`] when the scalar is out of range or the sum
/// is the point at infinity.
pub fn tweak_add<C: Verification>(
    secp: &Secp256k1<C>,
    base: &XOnlyPublicKey,
    tweak: &[u8; 32],
) -> Result<XOnlyPublicKey> {
    let scalar = Scalar::from_be_bytes(*tweak).map_err(|_| HushError::InvalidTweak)?;
    let (tweaked, _parity) = base
        .add_tweak(secp, &scalar)
        .map_err(|_| HushError::InvalidTweak)?;
    Ok(tweaked)
}

/// Derives silent-payment output keys for both protocol roles.
///
/// Owns a verification+signing context; all operations are reentrant, so a
/// single engine can be shared across scanning workers.
pub struct TweakEngine {
    secp: Secp256k1<All>,
}

impl TweakEngine {
    /// Creates an engine with a fresh secp256k1 context.
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Parses and validates a 32-byte sender key.
    ///
    /// Validation happens here, before any multiplication: a bad x
    /// coordinate is reported as [`HushError::InvalidSenderKey`] instead of
    /// surfacing from inside the curve library mid-derivation.
    pub fn parse_sender_key(&self, bytes: &[u8]) -> Result<XOnlyPublicKey> {
        XOnlyPublicKey::from_slice(bytes)
            .map_err(|e| HushError::InvalidSenderKey(e.to_string()))
    }

    /// Computes the tweak scalar `t = SHA256(x(P_sender * d))`.
    pub fn shared_secret_tweak(
        &self,
        sender: &XOnlyPublicKey,
        receiver_sk: &SecretKey,
    ) -> Result<[u8; 32]> {
        // The sender key is x-only; lift with the even-y convention.
        let sender_point = PublicKey::from_x_only_public_key(*sender, Parity::Even);
        let shared = sender_point
            .mul_tweak(&self.secp, &Scalar::from(*receiver_sk))
            .map_err(|_| HushError::InvalidTweak)?;
        let (shared_x, _parity) = shared.x_only_public_key();
        Ok(sha256(&shared_x.serialize()))
    }

    /// Receiver role: the output key `X'` expected for a payment from
    /// `sender` to this wallet.
    pub fn expected_output_key(
        &self,
        receiver_sk: &SecretKey,
        sender: &XOnlyPublicKey,
    ) -> Result<XOnlyPublicKey> {
        let tweak = self.shared_secret_tweak(sender, receiver_sk)?;
        let (base, _parity) = receiver_sk.public_key(&self.secp).x_only_public_key();
        tweak_add(&self.secp, &base, &tweak)
    }

    /// Sender role: the output key to pay a receiver whose published spend
    /// key is `receiver_spend`, funding from the input controlled by
    /// `sender_input_sk`.
    ///
    /// Must agree byte for byte with what [`Self::expected_output_key`]
    /// computes on the receiving side.
    pub fn sender_output_key(
        &self,
        receiver_spend: &XOnlyPublicKey,
        sender_input_sk: &SecretKey,
    ) -> Result<XOnlyPublicKey> {
        let tweak = self.shared_secret_tweak(receiver_spend, sender_input_sk)?;
        tweak_add(&self.secp, receiver_spend, &tweak)
    }

    /// Access to the underlying context for callers composing with the
    /// Taproot helpers.
    pub fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }
}

impl Default for TweakEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::rand::thread_rng;

    fn random_key(secp: &Secp256k1<All>) -> (SecretKey, XOnlyPublicKey) {
        let sk = SecretKey::new(&mut thread_rng());
        let (x, _) = sk.public_key(secp).x_only_public_key();
        (sk, x)
    }

    #[test]
    fn tweak_is_deterministic() {
        let engine = TweakEngine::new();
        let (receiver_sk, _) = random_key(engine.secp());
        let (_, sender_x) = random_key(engine.secp());

        let a = engine.expected_output_key(&receiver_sk, &sender_x).unwrap();
        let b = engine.expected_output_key(&receiver_sk, &sender_x).unwrap();
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn sender_and_receiver_agree() {
        // The core protocol property: the key the sender constructs equals
        // the key the receiver recognizes.
        let engine = TweakEngine::new();
        let (receiver_sk, receiver_x) = random_key(engine.secp());
        let (sender_sk, sender_x) = random_key(engine.secp());

        let sent = engine.sender_output_key(&receiver_x, &sender_sk).unwrap();
        let expected = engine.expected_output_key(&receiver_sk, &sender_x).unwrap();
        assert_eq!(sent.serialize(), expected.serialize());
    }

    #[test]
    fn different_senders_produce_different_keys() {
        let engine = TweakEngine::new();
        let (receiver_sk, _) = random_key(engine.secp());
        let (_, sender_a) = random_key(engine.secp());
        let (_, sender_b) = random_key(engine.secp());

        let a = engine.expected_output_key(&receiver_sk, &sender_a).unwrap();
        let b = engine.expected_output_key(&receiver_sk, &sender_b).unwrap();
        assert_ne!(a.serialize(), b.serialize());
    }

    #[test]
    fn invalid_sender_key_is_rejected_before_multiplication() {
        let engine = TweakEngine::new();
        // Not a valid x coordinate (p - 1 is, but all-0xFF is above p).
        let result = engine.parse_sender_key(&[0xFF; 32]);
        assert!(matches!(result, Err(HushError::InvalidSenderKey(_))));

        let short = engine.parse_sender_key(&[0x02; 16]);
        assert!(matches!(short, Err(HushError::InvalidSenderKey(_))));
    }

    #[test]
    fn out_of_range_tweak_is_invalid() {
        let engine = TweakEngine::new();
        let (_, base) = random_key(engine.secp());
        // 2^256 - 1 is far above the curve order.
        let result = tweak_add(engine.secp(), &base, &[0xFF; 32]);
        assert!(matches!(result, Err(HushError::InvalidTweak)));
    }
}
