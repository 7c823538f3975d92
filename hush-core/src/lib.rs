//! # Hush Core
//!
//! Core types, errors, and traits for the hush wallet.
//!
//! This crate provides the foundational building blocks used by all other
//! hush crates:
//!
//! - **Types**: Domain models for UTXOs, chain data, and the persisted wallet record
//! - **Errors**: The [`HushError`] hierarchy with scan-abort vs. skip classification
//! - **Constants**: Protocol constants and sizes
//! - **Traits**: Interfaces for the chain-data and address-index collaborators

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{HushError, Result};
pub use traits::*;
pub use types::*;
