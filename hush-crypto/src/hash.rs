//! Hashing utilities.
//!
//! Two hashes appear in the protocol:
//!
//! - plain SHA-256 over the x-only shared point, producing the
//!   silent-payment tweak scalar
//! - the BIP340 tagged hash `SHA256(SHA256(tag) || SHA256(tag) || msg)`,
//!   producing the Taproot output-key commitment

use bitcoin::hashes::{sha256 as sha256d, Hash, HashEngine};

/// Computes SHA-256 over `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}

/// Computes the BIP340 tagged hash of `data` under `tag`.
///
/// The tag hash is fed into the engine twice, per the BIP340 construction.
pub fn tagged_hash(tag: &str, data: &[u8]) -> [u8; 32] {
    let tag_hash = sha256d::Hash::hash(tag.as_bytes());

    let mut engine = sha256d::Hash::engine();
    engine.input(tag_hash.as_ref());
    engine.input(tag_hash.as_ref());
    engine.input(data);

    sha256d::Hash::from_engine(engine).to_byte_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_empty_vector() {
        // SHA-256 of the empty string, from FIPS 180-4 test vectors.
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn tagged_hash_is_domain_separated() {
        let data = [7u8; 32];
        assert_ne!(tagged_hash("TapTweak", &data), tagged_hash("TapLeaf", &data));
        assert_ne!(tagged_hash("TapTweak", &data), sha256(&data));
    }

    #[test]
    fn tagged_hash_is_deterministic() {
        let data = [1u8; 32];
        assert_eq!(tagged_hash("TapTweak", &data), tagged_hash("TapTweak", &data));
    }
}
