//! Wallet persistence.
//!
//! One JSON document per wallet. A record that fails to parse or violates
//! its own invariants surfaces as [`HushError::MalformedWallet`]; callers
//! treat that as fatal rather than guessing at repairs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::fs;
use tracing::{debug, instrument};

use hush_core::error::{HushError, Result};
use hush_core::types::WalletRecord;

/// Persistence boundary for the wallet record.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Whether a record already exists.
    async fn exists(&self) -> bool;

    /// Loads and validates the record.
    async fn load(&self) -> Result<WalletRecord>;

    /// Persists the record.
    async fn save(&self, record: &WalletRecord) -> Result<()>;
}

/// File-backed wallet store.
///
/// Saves write to a sibling temp file and rename into place, so a crash
/// mid-write leaves the previous record intact.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wallet file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[async_trait]
impl WalletStore for FileStore {
    async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<WalletRecord> {
        let bytes = fs::read(&self.path).await?;
        let record: WalletRecord = serde_json::from_slice(&bytes)
            .map_err(|e| HushError::MalformedWallet(e.to_string()))?;
        record.validate()?;
        debug!(cursor = record.blockheight_cursor, "loaded wallet record");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(path = %self.path.display()))]
    async fn save(&self, record: &WalletRecord) -> Result<()> {
        record.validate()?;
        let json = serde_json::to_vec_pretty(record)?;

        let tmp = self.temp_path();
        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(cursor = record.blockheight_cursor, "saved wallet record");
        Ok(())
    }
}

/// In-memory wallet store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<WalletRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a record.
    pub fn with_record(record: WalletRecord) -> Self {
        Self {
            inner: Mutex::new(Some(record)),
        }
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn exists(&self) -> bool {
        self.inner.lock().is_some()
    }

    async fn load(&self) -> Result<WalletRecord> {
        self.inner
            .lock()
            .clone()
            .ok_or_else(|| HushError::MalformedWallet("no wallet record".into()))
    }

    async fn save(&self, record: &WalletRecord) -> Result<()> {
        record.validate()?;
        *self.inner.lock() = Some(record.clone());
        Ok(())
    }
}
