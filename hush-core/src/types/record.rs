//! The persisted wallet record.

use serde::{Deserialize, Serialize};

use crate::error::{HushError, Result};
use crate::types::Utxo;

/// The wallet state as written to disk.
///
/// Only the seed phrase is persisted, never derived key material. The two
/// UTXO collections are serialized as `[txid, vout, sats]` tuples.
///
/// Invariants:
/// - `blockheight_cursor >= blockheight_birthday`
/// - the cursor only ever advances, and only after the blocks it covers
///   have been fully scanned
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// BIP39 seed phrase the wallet key derives from.
    pub mnemonic: String,
    /// Height at wallet creation; no funds can predate it.
    pub blockheight_birthday: u64,
    /// Last block height fully processed by a scan.
    pub blockheight_cursor: u64,
    /// Silent-payment UTXOs discovered by tweak matching.
    #[serde(default)]
    pub silent_utxos: Vec<Utxo>,
    /// Plain Taproot UTXOs from the address index.
    #[serde(default)]
    pub p2tr_utxos: Vec<Utxo>,
}

impl WalletRecord {
    /// Creates a fresh record with cursor == birthday and empty UTXO sets.
    pub fn new(mnemonic: String, birthday: u64) -> Self {
        Self {
            mnemonic,
            blockheight_birthday: birthday,
            blockheight_cursor: birthday,
            silent_utxos: Vec::new(),
            p2tr_utxos: Vec::new(),
        }
    }

    /// Validates the record invariants.
    pub fn validate(&self) -> Result<()> {
        if self.mnemonic.trim().is_empty() {
            return Err(HushError::MalformedWallet("mnemonic is empty".into()));
        }
        if self.blockheight_cursor < self.blockheight_birthday {
            return Err(HushError::MalformedWallet(format!(
                "cursor {} is below birthday {}",
                self.blockheight_cursor, self.blockheight_birthday
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn fresh_record_is_valid() {
        let record = WalletRecord::new(PHRASE.into(), 800_000);
        assert_eq!(record.blockheight_cursor, record.blockheight_birthday);
        record.validate().unwrap();
    }

    #[test]
    fn cursor_below_birthday_is_malformed() {
        let mut record = WalletRecord::new(PHRASE.into(), 800_000);
        record.blockheight_cursor = 700_000;
        assert!(matches!(
            record.validate(),
            Err(HushError::MalformedWallet(_))
        ));
    }

    #[test]
    fn missing_required_field_fails_deserialization() {
        // No blockheight_cursor.
        let json = r#"{"mnemonic": "a b c", "blockheight_birthday": 1}"#;
        let parsed: std::result::Result<WalletRecord, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn utxo_lists_default_to_empty() {
        let json = r#"{"mnemonic": "a b c", "blockheight_birthday": 1, "blockheight_cursor": 1}"#;
        let record: WalletRecord = serde_json::from_str(json).unwrap();
        assert!(record.silent_utxos.is_empty());
        assert!(record.p2tr_utxos.is_empty());
    }
}
