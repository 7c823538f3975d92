//! # Hush Crypto
//!
//! Elliptic-curve operations for the hush wallet:
//!
//! - **Hashing**: SHA-256 and BIP340 tagged hashes ([`hash`])
//! - **Taproot**: key-spend-only output computation ([`taproot`])
//! - **Tweaks**: the ECDH-derived silent-payment tweak ([`tweak`])
//!
//! The x-only tweak-add primitive is implemented once ([`tweak_add`]) and
//! shared by the Taproot output computation and the silent-payment tweak,
//! so the wallet's own receiving script and the scanner's expected key can
//! never silently diverge.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod hash;
pub mod taproot;
pub mod tweak;

pub use hash::{sha256, tagged_hash};
pub use taproot::{key_spend_script, output_key, p2tr_output_key};
pub use tweak::{tweak_add, TweakEngine};
