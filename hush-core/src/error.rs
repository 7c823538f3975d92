//! Error types for hush.
//!
//! One `thiserror` hierarchy shared across the workspace. The scanner's
//! failure policy is encoded in the classification helpers: transport
//! failures abort a whole invocation, per-candidate cryptographic anomalies
//! are skipped and the scan continues.

use thiserror::Error;

/// Result type alias using `HushError`.
pub type Result<T> = std::result::Result<T, HushError>;

/// Main error type for all hush operations.
#[derive(Debug, Error)]
pub enum HushError {
    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Chain-data or address-index collaborator unreachable, or it returned
    /// a malformed response. Aborts the in-progress scan or refresh with no
    /// partial persistence beyond already-committed checkpoints.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The JSON-RPC endpoint answered with an error object.
    #[error("RPC call '{method}' failed: {detail}")]
    Rpc {
        /// JSON-RPC method name.
        method: String,
        /// Error message reported by the node.
        detail: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // WALLET ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Persisted wallet record missing required fields or unreadable. Fatal.
    #[error("Malformed wallet record: {0}")]
    MalformedWallet(String),

    /// A scan tried to move the wallet cursor backwards.
    #[error("Cursor regression: cursor at {current}, requested {requested}")]
    CursorRegression {
        /// Currently persisted cursor height.
        current: u64,
        /// Height the caller tried to set.
        requested: u64,
    },

    /// Mnemonic or BIP32 derivation failure.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Checksum, prefix, length, or version failure while decoding a
    /// silent-payment address. Recoverable; does not affect wallet state.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    /// A raw key had the wrong length.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // TWEAK ERRORS (per-candidate, locally absorbed by the scanner)
    // ═══════════════════════════════════════════════════════════════════════════
    /// Tweak addition produced the point at infinity, or the tweak scalar
    /// was out of range. A degenerate key relationship, not a systemic
    /// fault: the candidate is treated as a non-match.
    #[error("Invalid tweak: point at infinity or out-of-range scalar")]
    InvalidTweak,

    /// A candidate's first-input key is not a valid x-only point.
    #[error("Invalid sender key: {0}")]
    InvalidSenderKey(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // AMBIENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HushError {
    /// Returns true if this error must abort a whole scan/refresh
    /// invocation (the scanner cannot resume mid-range past it).
    pub fn is_transport(&self) -> bool {
        matches!(self, HushError::Transport(_) | HushError::Rpc { .. })
    }

    /// Returns true for per-candidate cryptographic anomalies the scanner
    /// absorbs locally (skip and continue).
    pub fn is_candidate_anomaly(&self) -> bool {
        matches!(
            self,
            HushError::InvalidTweak | HushError::InvalidSenderKey(_)
        )
    }

    /// Returns true for validation failures that leave wallet state intact.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HushError::MalformedAddress(_) | HushError::InvalidKeyLength { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HushError::InvalidKeyLength {
            expected: 33,
            actual: 20,
        };
        assert!(err.to_string().contains("33"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_error_classification() {
        assert!(HushError::Transport("down".into()).is_transport());
        assert!(HushError::Rpc {
            method: "getblock".into(),
            detail: "not found".into()
        }
        .is_transport());
        assert!(!HushError::InvalidTweak.is_transport());

        assert!(HushError::InvalidTweak.is_candidate_anomaly());
        assert!(HushError::InvalidSenderKey("bad x".into()).is_candidate_anomaly());
        assert!(!HushError::MalformedWallet("no mnemonic".into()).is_candidate_anomaly());

        assert!(HushError::MalformedAddress("checksum".into()).is_validation());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let hush_result: Result<serde_json::Value> = json_result.map_err(HushError::from);
        assert!(matches!(hush_result, Err(HushError::Json(_))));
    }
}
