//! Collaborator traits for hush.
//!
//! These seams separate the cryptographic core from the outside world:
//! a block-by-height chain source, an address-indexed UTXO lookup, the
//! scanner's checkpoint sink, and the (future) spend path.

use async_trait::async_trait;

use bitcoin::{Amount, BlockHash, Txid};

use crate::error::Result;
use crate::types::{BlockSummary, TxInfo, Utxo};

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Block-by-height chain data source.
///
/// Implementations might use:
/// - Bitcoin Core JSON-RPC (production)
/// - An in-memory fixture (testing)
///
/// Any failure to reach the source is a [`crate::HushError::Transport`]
/// error and aborts the caller's whole invocation.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Current chain tip height.
    async fn tip_height(&self) -> Result<u64>;

    /// Block hash at the given height.
    async fn block_hash(&self, height: u64) -> Result<BlockHash>;

    /// Block identity and transaction id list for the given hash.
    async fn block(&self, hash: &BlockHash) -> Result<BlockSummary>;

    /// Raw transaction with resolved inputs and outputs.
    ///
    /// `block` scopes the lookup to a containing block so pruned nodes
    /// without a full transaction index can still answer.
    async fn transaction(&self, txid: &Txid, block: Option<&BlockHash>) -> Result<TxInfo>;

    /// Whether the given output is unspent as of query time.
    async fn is_unspent(&self, txid: &Txid, vout: u32) -> Result<bool>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS INDEX
// ═══════════════════════════════════════════════════════════════════════════════

/// Address-indexed unspent-output lookup (e.g. an Esplora instance).
#[async_trait]
pub trait AddressIndex: Send + Sync {
    /// Unspent outputs of a plain address.
    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHECKPOINT SINK
// ═══════════════════════════════════════════════════════════════════════════════

/// Receiver of per-block scan checkpoints.
///
/// The scanner commits `(height, matches)` after each fully-processed block
/// (or small batch) so a crash only loses work past the last committed
/// height. A commit failure aborts the scan.
#[async_trait]
pub trait CheckpointSink: Send {
    /// Records the matches of all blocks up to and including `height` and
    /// advances the cursor to `height`.
    async fn commit(&mut self, height: u64, matches: &[Utxo]) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SPEND PATH (future collaborator)
// ═══════════════════════════════════════════════════════════════════════════════

/// Boundary of the not-yet-implemented spend path.
///
/// Selecting tweaked vs. plain signing based on the source UTXO and
/// destination address lives behind this interface; nothing in the core
/// calls it yet.
pub trait TransactionBuilder: Send + Sync {
    /// Builds and signs a transaction spending `utxo` to `destination`.
    fn build_and_sign(
        &self,
        utxo: &Utxo,
        destination: &str,
        amount: Amount,
        fee: Amount,
    ) -> Result<Vec<u8>>;
}
