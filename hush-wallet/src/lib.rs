//! # Hush Wallet
//!
//! The wallet side of hush:
//!
//! - [`KeyMaterial`]: the single derived keypair (BIP39 seed, BIP32 path)
//! - [`WalletLedger`]: in-memory wallet state with monotonic-cursor rules
//! - [`WalletStore`]: persistence behind a trait, with a file-backed and an
//!   in-memory implementation
//! - [`PersistentSink`]: per-block scan checkpointing into the store
//!
//! ## Example
//!
//! ```rust,ignore
//! use hush_wallet::{FileStore, KeyMaterial, WalletLedger, WalletStore};
//!
//! let record = store.load().await?;
//! let keys = KeyMaterial::from_mnemonic(&record.mnemonic, network)?;
//! let ledger = WalletLedger::new(record);
//! println!("{}", keys.p2tr_address(network)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod keys;
pub mod ledger;
pub mod sink;
pub mod store;

pub use keys::KeyMaterial;
pub use ledger::{Balances, WalletLedger};
pub use sink::PersistentSink;
pub use store::{FileStore, MemoryStore, WalletStore};
