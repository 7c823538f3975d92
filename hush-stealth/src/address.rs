//! Silent-payment address encoding.
//!
//! An address is `bech32m(hrp, 0x00 || x(spend_key))`: a one-byte version
//! (0 = no separate scanning key, no address reuse protection) followed by
//! the 32-byte x-only spend key. The human-readable prefix is an explicit
//! configuration parameter; nothing here guesses it from ambient network
//! state.

use bitcoin::bech32::primitives::decode::CheckedHrpstring;
use bitcoin::bech32::{self, Bech32m, Hrp};
use bitcoin::secp256k1::{PublicKey, XOnlyPublicKey};

use hush_core::constants::{SILENT_ADDRESS_VERSION, SILENT_PAYLOAD_SIZE};
use hush_core::error::{HushError, Result};

/// Encoder/decoder for silent-payment addresses under a fixed prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCodec {
    hrp: Hrp,
}

impl AddressCodec {
    /// Creates a codec for the given prefix.
    pub fn new(hrp: Hrp) -> Self {
        Self { hrp }
    }

    /// Creates a codec from a prefix string.
    pub fn from_prefix(prefix: &str) -> Result<Self> {
        let hrp = Hrp::parse(prefix)
            .map_err(|e| HushError::MalformedAddress(format!("invalid prefix: {e}")))?;
        Ok(Self { hrp })
    }

    /// The configured human-readable prefix.
    pub fn hrp(&self) -> Hrp {
        self.hrp
    }

    /// Encodes a spend public key into an address string.
    ///
    /// The compressed key's parity byte is dropped; only the x coordinate
    /// is published.
    pub fn encode(&self, spend_key: &PublicKey) -> Result<String> {
        let (x_only, _parity) = spend_key.x_only_public_key();

        let mut payload = Vec::with_capacity(SILENT_PAYLOAD_SIZE);
        payload.push(SILENT_ADDRESS_VERSION);
        payload.extend_from_slice(&x_only.serialize());

        bech32::encode::<Bech32m>(self.hrp, &payload)
            .map_err(|e| HushError::MalformedAddress(format!("encoding failed: {e}")))
    }

    /// Decodes an address string back into its x-only spend key.
    ///
    /// Fails with [`HushError::MalformedAddress`] on checksum failure,
    /// prefix mismatch, payload length other than 33, or an unsupported
    /// version byte.
    pub fn decode(&self, address: &str) -> Result<XOnlyPublicKey> {
        let checked = CheckedHrpstring::new::<Bech32m>(address)
            .map_err(|e| HushError::MalformedAddress(format!("checksum failure: {e}")))?;

        if checked.hrp() != self.hrp {
            return Err(HushError::MalformedAddress(format!(
                "prefix '{}' does not match expected '{}'",
                checked.hrp(),
                self.hrp
            )));
        }

        let payload: Vec<u8> = checked.byte_iter().collect();
        if payload.len() != SILENT_PAYLOAD_SIZE {
            return Err(HushError::MalformedAddress(format!(
                "payload is {} bytes, expected {}",
                payload.len(),
                SILENT_PAYLOAD_SIZE
            )));
        }

        let version = payload[0];
        if version != SILENT_ADDRESS_VERSION {
            return Err(HushError::MalformedAddress(format!(
                "unsupported version {version}"
            )));
        }

        XOnlyPublicKey::from_slice(&payload[1..])
            .map_err(|e| HushError::MalformedAddress(format!("invalid spend key: {e}")))
    }
}
