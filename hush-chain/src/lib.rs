//! # Hush Chain
//!
//! HTTP collaborators for the hush wallet:
//!
//! - [`CoreRpcClient`]: Bitcoin Core JSON-RPC, implementing
//!   [`hush_core::ChainSource`]
//! - [`EsploraClient`]: Esplora-style address index, implementing
//!   [`hush_core::AddressIndex`]
//!
//! Both treat any unreachable endpoint or malformed response as a
//! [`hush_core::HushError::Transport`] error; nothing here retries.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod esplora;
pub mod rpc;

pub use esplora::{EsploraClient, EsploraConfig};
pub use rpc::{CoreRpcClient, RpcConfig};
