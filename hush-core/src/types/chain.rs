//! Resolved chain data as consumed by the scanner.
//!
//! These are the post-parse shapes: the JSON-RPC DTOs live in `hush-chain`
//! and convert into these types at the transport boundary.

use bitcoin::{Amount, BlockHash, ScriptBuf, Txid};

/// A block's identity plus its transaction id list.
#[derive(Clone, Debug)]
pub struct BlockSummary {
    /// Block hash.
    pub hash: BlockHash,
    /// Block height.
    pub height: u64,
    /// Transaction ids in block order.
    pub txids: Vec<Txid>,
}

/// A transaction input as the scanner sees it.
///
/// Coinbase inputs carry no previous outpoint.
#[derive(Clone, Debug)]
pub struct TxInput {
    /// Previous transaction id, absent for coinbase.
    pub prev_txid: Option<Txid>,
    /// Previous output index, absent for coinbase.
    pub prev_vout: Option<u32>,
}

impl TxInput {
    /// The previous outpoint, if this input has one.
    pub fn outpoint(&self) -> Option<(Txid, u32)> {
        Some((self.prev_txid?, self.prev_vout?))
    }
}

/// A transaction output with its resolved script.
#[derive(Clone, Debug)]
pub struct TxOutput {
    /// Output index.
    pub index: u32,
    /// Output value.
    pub value: Amount,
    /// Output script.
    pub script: ScriptBuf,
}

/// A transaction with resolved inputs and outputs.
#[derive(Clone, Debug)]
pub struct TxInfo {
    /// Transaction id.
    pub txid: Txid,
    /// Inputs in order; the first input drives candidate eligibility.
    pub inputs: Vec<TxInput>,
    /// Outputs in order.
    pub outputs: Vec<TxOutput>,
}

impl TxInfo {
    /// The previous outpoint of the first input, if resolvable.
    pub fn first_input_outpoint(&self) -> Option<(Txid, u32)> {
        self.inputs.first().and_then(TxInput::outpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn coinbase_has_no_outpoint() {
        let input = TxInput {
            prev_txid: None,
            prev_vout: None,
        };
        assert!(input.outpoint().is_none());
    }

    #[test]
    fn first_input_outpoint() {
        let txid =
            Txid::from_str("2bcd9a2468cb4f095b407db0101e554bcf9624e8866a1f1d2e2bcc8aa2d21d07")
                .unwrap();
        let tx = TxInfo {
            txid,
            inputs: vec![TxInput {
                prev_txid: Some(txid),
                prev_vout: Some(2),
            }],
            outputs: vec![],
        };
        assert_eq!(tx.first_input_outpoint(), Some((txid, 2)));
    }
}
