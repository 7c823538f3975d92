//! Unspent transaction outputs.

use bitcoin::{Amount, Txid};
use serde::{Deserialize, Serialize};

/// An unspent output tracked by the wallet.
///
/// The same shape serves both collections: plain Taproot UTXOs found by
/// address lookup and silent-payment UTXOs found by tweak matching. They
/// are tracked separately because the discovery mechanisms differ, but both
/// compose into the total spendable balance.
///
/// Persisted as a `[txid, vout, sats]` tuple to match the wallet file
/// format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UtxoTuple", into = "UtxoTuple")]
pub struct Utxo {
    /// Transaction id of the funding transaction.
    pub txid: Txid,
    /// Output index within the funding transaction.
    pub vout: u32,
    /// Output value.
    pub value: Amount,
}

impl Utxo {
    /// Creates a UTXO from its parts.
    pub fn new(txid: Txid, vout: u32, value: Amount) -> Self {
        Self { txid, vout, value }
    }

    /// The `txid:vout` outpoint string.
    pub fn outpoint(&self) -> String {
        format!("{}:{}", self.txid, self.vout)
    }
}

impl std::fmt::Display for Utxo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}, {} sats",
            self.txid,
            self.vout,
            self.value.to_sat()
        )
    }
}

/// Wire shape of a persisted UTXO.
type UtxoTuple = (Txid, u32, u64);

impl From<UtxoTuple> for Utxo {
    fn from((txid, vout, sats): UtxoTuple) -> Self {
        Self {
            txid,
            vout,
            value: Amount::from_sat(sats),
        }
    }
}

impl From<Utxo> for UtxoTuple {
    fn from(utxo: Utxo) -> Self {
        (utxo.txid, utxo.vout, utxo.value.to_sat())
    }
}
