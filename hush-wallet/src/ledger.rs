//! In-memory wallet state and its update rules.
//!
//! The ledger wraps the persisted [`WalletRecord`] and is the only place
//! that mutates it. Two rules hold at all times:
//!
//! - the cursor never moves backwards ([`HushError::CursorRegression`])
//! - silent-payment UTXOs are only appended; because the cursor is
//!   monotonic, no block is ever scanned twice, so no duplicate outpoint
//!   can arrive

use bitcoin::Amount;
use serde::Serialize;
use tracing::debug;

use hush_core::error::{HushError, Result};
use hush_core::types::{Utxo, WalletRecord};

/// Per-collection wallet balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Balances {
    /// Sum of silent-payment UTXOs.
    pub silent: Amount,
    /// Sum of plain Taproot UTXOs.
    pub plain: Amount,
}

impl Balances {
    /// Combined balance of both collections.
    pub fn total(&self) -> Amount {
        self.silent + self.plain
    }
}

/// The wallet state and its update operations.
#[derive(Clone, Debug)]
pub struct WalletLedger {
    record: WalletRecord,
}

impl WalletLedger {
    /// Wraps a loaded record.
    pub fn new(record: WalletRecord) -> Self {
        Self { record }
    }

    /// Read access to the underlying record.
    pub fn record(&self) -> &WalletRecord {
        &self.record
    }

    /// Consumes the ledger, returning the record for persistence.
    pub fn into_record(self) -> WalletRecord {
        self.record
    }

    /// The last fully-scanned block height.
    pub fn cursor(&self) -> u64 {
        self.record.blockheight_cursor
    }

    /// Silent-payment UTXOs discovered so far.
    pub fn silent_utxos(&self) -> &[Utxo] {
        &self.record.silent_utxos
    }

    /// Plain Taproot UTXOs from the last refresh.
    pub fn p2tr_utxos(&self) -> &[Utxo] {
        &self.record.p2tr_utxos
    }

    /// Appends newly discovered silent-payment UTXOs.
    pub fn record_stealth_matches(&mut self, matches: &[Utxo]) {
        if !matches.is_empty() {
            debug!(count = matches.len(), "recording silent-payment utxos");
        }
        self.record.silent_utxos.extend_from_slice(matches);
    }

    /// Replaces the plain Taproot UTXO set wholesale.
    ///
    /// The address index is authoritative for this collection, so stale
    /// entries disappear on every refresh.
    pub fn refresh_plain_utxos(&mut self, utxos: Vec<Utxo>) {
        debug!(count = utxos.len(), "refreshing plain utxos");
        self.record.p2tr_utxos = utxos;
    }

    /// Advances the scan cursor to `height`.
    ///
    /// Only ever call this after every block up to and including `height`
    /// has been fully scanned. Moving backwards is refused.
    pub fn advance_cursor(&mut self, height: u64) -> Result<()> {
        if height < self.record.blockheight_cursor {
            return Err(HushError::CursorRegression {
                current: self.record.blockheight_cursor,
                requested: height,
            });
        }
        self.record.blockheight_cursor = height;
        Ok(())
    }

    /// Sums each UTXO collection independently.
    pub fn balances(&self) -> Balances {
        Balances {
            silent: self.record.silent_utxos.iter().map(|u| u.value).sum(),
            plain: self.record.p2tr_utxos.iter().map(|u| u.value).sum(),
        }
    }
}
