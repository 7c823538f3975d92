//! Scan checkpointing into the wallet store.

use async_trait::async_trait;

use hush_core::error::Result;
use hush_core::traits::CheckpointSink;
use hush_core::types::Utxo;

use crate::ledger::WalletLedger;
use crate::store::WalletStore;

/// Checkpoint sink that folds scan results into a ledger and persists it.
///
/// Each commit appends the batch's matches, advances the cursor, and saves
/// the whole record. If a commit fails the on-disk record still describes
/// the last successful checkpoint, so the next scan resumes from there.
pub struct PersistentSink<'a, S: WalletStore> {
    ledger: &'a mut WalletLedger,
    store: &'a S,
}

impl<'a, S: WalletStore> PersistentSink<'a, S> {
    /// Couples a ledger with its backing store.
    pub fn new(ledger: &'a mut WalletLedger, store: &'a S) -> Self {
        Self { ledger, store }
    }
}

#[async_trait]
impl<S: WalletStore> CheckpointSink for PersistentSink<'_, S> {
    async fn commit(&mut self, height: u64, matches: &[Utxo]) -> Result<()> {
        self.ledger.record_stealth_matches(matches);
        self.ledger.advance_cursor(height)?;
        self.store.save(self.ledger.record()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::Hash;
    use bitcoin::{Amount, Txid};

    use hush_core::types::WalletRecord;

    use crate::store::MemoryStore;

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[tokio::test]
    async fn commit_persists_matches_and_cursor() {
        let store = MemoryStore::new();
        let mut ledger = WalletLedger::new(WalletRecord::new(PHRASE.into(), 800_000));

        let utxo = Utxo::new(Txid::from_byte_array([1; 32]), 0, Amount::from_sat(500));
        {
            let mut sink = PersistentSink::new(&mut ledger, &store);
            sink.commit(800_005, std::slice::from_ref(&utxo))
                .await
                .unwrap();
            sink.commit(800_010, &[]).await.unwrap();
        }

        let saved = store.load().await.unwrap();
        assert_eq!(saved.blockheight_cursor, 800_010);
        assert_eq!(saved.silent_utxos, vec![utxo]);
    }

    #[tokio::test]
    async fn regressive_commit_is_refused() {
        let store = MemoryStore::new();
        let mut record = WalletRecord::new(PHRASE.into(), 800_000);
        record.blockheight_cursor = 800_100;
        let mut ledger = WalletLedger::new(record);

        let mut sink = PersistentSink::new(&mut ledger, &store);
        assert!(sink.commit(800_050, &[]).await.is_err());
        // Nothing was persisted.
        assert!(!store.exists().await);
    }
}
