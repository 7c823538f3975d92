//! # Hush Scanner
//!
//! Walks a block-height range looking for silent payments addressed to the
//! wallet key.
//!
//! For every transaction in range, a candidate output is eligible only if:
//!
//! 1. its own script is witness-v1 Taproot (cheap check, done first),
//! 2. it is still unspent as of query time,
//! 3. the transaction's first input resolves to a previous output that is
//!    itself Taproot — its x-only key becomes the sender key.
//!
//! Eligible candidates go through the tweak derivation; a byte-for-byte
//! match against the expected output key records a UTXO. Per-candidate
//! cryptographic anomalies are skipped; any transport failure aborts the
//! invocation. After each fully-processed block (or configured batch) the
//! scanner commits its cursor through a [`CheckpointSink`], so a crash only
//! re-scans blocks past the last committed height.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hush_scanner::{ChainScanner, ScannerConfig};
//!
//! let scanner = ChainScanner::new(wallet.secret_key());
//! let outcome = scanner.scan(&rpc, cursor, tip, &mut sink, None).await?;
//! println!("found {} payments", outcome.matches.len());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use std::time::Instant;

use bitcoin::secp256k1::{SecretKey, XOnlyPublicKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use hush_core::constants::DEFAULT_CHECKPOINT_INTERVAL;
use hush_core::error::Result;
use hush_core::traits::{ChainSource, CheckpointSink};
use hush_core::types::{TxInfo, Utxo};
use hush_crypto::{p2tr_output_key, TweakEngine};

/// Scanner configuration.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// Fully-processed blocks between cursor checkpoints (minimum 1).
    pub checkpoint_interval: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the checkpoint interval.
    pub fn checkpoint_interval(mut self, blocks: u64) -> Self {
        self.checkpoint_interval = blocks.max(1);
        self
    }
}

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

/// Scan progress information.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Total blocks in the requested range.
    pub total_blocks: u64,
    /// Blocks fully processed so far.
    pub blocks_scanned: u64,
    /// Matches found so far.
    pub matches: u64,
    /// Current scan rate (blocks per second).
    pub rate: f64,
    /// Estimated time remaining in seconds.
    pub eta_seconds: Option<f64>,
    /// Percentage complete (0-100).
    pub percent: f64,
}

impl ScanProgress {
    /// Creates a new progress tracker for a range of `total_blocks`.
    pub fn new(total_blocks: u64) -> Self {
        Self {
            total_blocks,
            blocks_scanned: 0,
            matches: 0,
            rate: 0.0,
            eta_seconds: None,
            percent: 0.0,
        }
    }

    /// Updates progress with new values.
    pub fn update(&mut self, blocks_scanned: u64, matches: u64, elapsed_ms: u64) {
        self.blocks_scanned = blocks_scanned;
        self.matches = matches;

        if elapsed_ms > 0 {
            self.rate = (blocks_scanned as f64 / elapsed_ms as f64) * 1000.0;
        }

        if self.total_blocks > 0 {
            self.percent = (blocks_scanned as f64 / self.total_blocks as f64) * 100.0;

            if self.rate > 0.0 {
                let remaining = self.total_blocks.saturating_sub(blocks_scanned);
                self.eta_seconds = Some(remaining as f64 / self.rate);
            }
        }
    }
}

/// Statistics for one scan invocation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Blocks fully processed.
    pub blocks_scanned: u64,
    /// Transactions enumerated.
    pub transactions_seen: u64,
    /// Outputs that passed the script-type check.
    pub candidates_evaluated: u64,
    /// Silent payments found.
    pub matches: u64,
    /// Candidates skipped for degenerate key relationships.
    pub anomalies_skipped: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl ScanStats {
    /// Returns the scan rate in blocks per second.
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.blocks_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }
}

/// Result of a completed scan.
#[derive(Clone, Debug)]
pub struct ScanOutcome {
    /// The new cursor height (the end of the fully-processed range).
    pub cursor: u64,
    /// All UTXOs discovered in the range.
    pub matches: Vec<Utxo>,
    /// Counters for the invocation.
    pub stats: ScanStats,
}

/// Scanner for silent payments addressed to a single wallet key.
pub struct ChainScanner {
    engine: TweakEngine,
    receiver_sk: SecretKey,
    config: ScannerConfig,
}

impl ChainScanner {
    /// Creates a scanner for the given receiver key with default config.
    pub fn new(receiver_sk: SecretKey) -> Self {
        Self {
            engine: TweakEngine::new(),
            receiver_sk,
            config: ScannerConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Scans the inclusive height range `[cursor, target]`.
    ///
    /// Commits `(height, matches-since-last-commit)` to `sink` after each
    /// checkpoint batch and always after the final block. Returns the
    /// whole range's matches; on error the sink has only received
    /// fully-processed checkpoints and the persisted cursor is unchanged
    /// past them.
    #[instrument(skip(self, chain, sink, progress))]
    pub async fn scan(
        &self,
        chain: &dyn ChainSource,
        cursor: u64,
        target: u64,
        sink: &mut dyn CheckpointSink,
        progress: Option<&ProgressCallback>,
    ) -> Result<ScanOutcome> {
        let mut stats = ScanStats::default();

        if target < cursor {
            debug!(cursor, target, "nothing to scan");
            return Ok(ScanOutcome {
                cursor,
                matches: Vec::new(),
                stats,
            });
        }

        let start = Instant::now();
        let total_blocks = target - cursor + 1;
        let mut tracker = ScanProgress::new(total_blocks);

        info!(cursor, target, total_blocks, "starting scan");

        let mut all_matches = Vec::new();
        let mut pending = Vec::new();

        for height in cursor..=target {
            let block_matches = self.scan_block(chain, height, &mut stats).await?;
            stats.blocks_scanned += 1;
            stats.matches += block_matches.len() as u64;

            pending.extend(block_matches.iter().cloned());
            all_matches.extend(block_matches);

            let batch_done = (height - cursor + 1) % self.config.checkpoint_interval == 0;
            if batch_done || height == target {
                sink.commit(height, &pending).await?;
                pending.clear();
            }

            if let Some(callback) = progress {
                tracker.update(
                    stats.blocks_scanned,
                    stats.matches,
                    start.elapsed().as_millis() as u64,
                );
                callback(tracker.clone());
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            blocks = stats.blocks_scanned,
            candidates = stats.candidates_evaluated,
            matches = stats.matches,
            duration_ms = stats.duration_ms,
            "scan complete"
        );

        Ok(ScanOutcome {
            cursor: target,
            matches: all_matches,
            stats,
        })
    }

    /// Processes one block, returning the UTXOs discovered in it.
    async fn scan_block(
        &self,
        chain: &dyn ChainSource,
        height: u64,
        stats: &mut ScanStats,
    ) -> Result<Vec<Utxo>> {
        let hash = chain.block_hash(height).await?;
        let block = chain.block(&hash).await?;
        debug!(height, txs = block.txids.len(), "scanning block");

        let mut found = Vec::new();
        for txid in &block.txids {
            let tx = chain.transaction(txid, Some(&hash)).await?;
            stats.transactions_seen += 1;
            found.extend(self.scan_transaction(chain, &tx, height, stats).await?);
        }
        Ok(found)
    }

    /// Evaluates one transaction's outputs against the wallet key.
    async fn scan_transaction(
        &self,
        chain: &dyn ChainSource,
        tx: &TxInfo,
        height: u64,
        stats: &mut ScanStats,
    ) -> Result<Vec<Utxo>> {
        let mut found = Vec::new();
        // The first input is fixed per transaction, so the expected key is
        // resolved at most once and reused across its outputs.
        let mut expected_cache: Option<Option<XOnlyPublicKey>> = None;

        for output in &tx.outputs {
            // (1) cheap script-type check before anything else
            if !output.script.is_p2tr() {
                continue;
            }
            stats.candidates_evaluated += 1;

            // (2) unspent as of query time
            if !chain.is_unspent(&tx.txid, output.index).await? {
                continue;
            }

            // (3) first input must resolve to a Taproot prevout
            let expected = match expected_cache {
                Some(cached) => cached,
                None => {
                    let derived = self.expected_key_for(chain, tx, stats).await?;
                    expected_cache = Some(derived);
                    derived
                }
            };
            let Some(expected) = expected else {
                // No output of this transaction can match.
                break;
            };

            if p2tr_output_key(&output.script) == Some(expected) {
                info!(height, txid = %tx.txid, vout = output.index, "found silent payment");
                found.push(Utxo::new(tx.txid, output.index, output.value));
            }
        }

        Ok(found)
    }

    /// Resolves the sender key from the first input and derives the
    /// expected output key.
    ///
    /// `Ok(None)` covers every per-transaction rejection: coinbase, missing
    /// or non-Taproot prevout, and degenerate key relationships (the
    /// latter also counted in the stats). Transport failures propagate.
    async fn expected_key_for(
        &self,
        chain: &dyn ChainSource,
        tx: &TxInfo,
        stats: &mut ScanStats,
    ) -> Result<Option<XOnlyPublicKey>> {
        let Some((prev_txid, prev_vout)) = tx.first_input_outpoint() else {
            return Ok(None);
        };

        let prev = chain.transaction(&prev_txid, None).await?;
        let Some(prev_out) = prev.outputs.iter().find(|o| o.index == prev_vout) else {
            return Ok(None);
        };
        if !prev_out.script.is_p2tr() {
            return Ok(None);
        }

        let sender_bytes = &prev_out.script.as_bytes()[2..];
        let sender = match self.engine.parse_sender_key(sender_bytes) {
            Ok(key) => key,
            Err(e) if e.is_candidate_anomaly() => {
                warn!(txid = %tx.txid, %e, "skipping candidate");
                stats.anomalies_skipped += 1;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match self.engine.expected_output_key(&self.receiver_sk, &sender) {
            Ok(expected) => Ok(Some(expected)),
            Err(e) if e.is_candidate_anomaly() => {
                warn!(txid = %tx.txid, %e, "skipping candidate");
                stats.anomalies_skipped += 1;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
