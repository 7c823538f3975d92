//! Domain types for hush.
//!
//! - [`Utxo`]: an unspent output tracked by the wallet
//! - [`TxInfo`] and friends: resolved chain data as seen by the scanner
//! - [`WalletRecord`]: the persisted wallet state

mod chain;
mod record;
mod utxo;

pub use chain::*;
pub use record::*;
pub use utxo::*;
