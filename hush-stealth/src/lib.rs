//! # Hush Stealth
//!
//! The silent-payment address layer:
//!
//! - [`AddressCodec`]: bech32m encoding/decoding of the published address
//! - [`create_payment`]: sender-side construction of the one-time output
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use hush_stealth::{AddressCodec, create_payment};
//!
//! // Receiver: publish an address derived from the wallet key.
//! let codec = AddressCodec::from_prefix("sp")?;
//! let address = codec.encode(&wallet_public_key)?;
//!
//! // Sender: pay to it from a Taproot input.
//! let payment = create_payment(&codec, &address, &input_secret_key)?;
//! // payment.script is the output to include in the transaction
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod payment;

pub use address::AddressCodec;
pub use payment::{create_payment, SilentPayment};
