//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! Operation failures ([`ChainError`]) are distinct from verification
//! findings ([`IntegrityViolation`]): a failed `append` or `mutate_payload`
//! leaves the chain untouched, whereas a violation describes the state the
//! chain is already in.

use thiserror::Error;

use crate::digest::RecordHash;

/// Error returned by chain and record operations.
#[derive(Error, Debug)]
pub enum ChainError {
    /// The payload could not be canonically encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] CanonicalizationError),

    /// Mutation target index is outside `0..len`.
    #[error("record index {index} out of range for chain of length {len}")]
    IndexOutOfRange {
        /// The index the caller asked for. Signed so raw user input can be
        /// reported verbatim.
        index: i64,
        /// Chain length at the time of the call.
        len: usize,
    },

    /// Operation requires at least one record. Unreachable for chains built
    /// through [`crate::Chain`] constructors.
    #[error("cannot operate on empty chain")]
    EmptyChain,
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values have no stable canonical text form and are refused.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a hex-encoded record hash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// Wrong number of hex characters.
    #[error("expected 64 hex chars, got {0}")]
    Length(usize),

    /// Non-hex character in input.
    #[error("invalid hex: {0:?}")]
    InvalidHex(String),
}

/// Error parsing a timestamp from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Only `Z`-suffixed UTC timestamps are accepted.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NotUtc(String),

    /// The string is not RFC 3339.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    Invalid {
        /// Rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },
}

/// The first integrity violation found by [`crate::Chain::verify`].
///
/// Verification scans in ascending index order, so the violation with the
/// lowest index is the one reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// The genesis record's stored hash does not match its content.
    #[error("genesis record hash mismatch: stored {stored}, recomputed {recomputed}")]
    GenesisHashMismatch {
        /// Hash stored on the record.
        stored: RecordHash,
        /// Hash recomputed from the record's fields.
        recomputed: RecordHash,
    },

    /// `records[index].previous_hash` differs from `records[index - 1].identity_hash`.
    #[error("broken link at record {index}: expected previous hash {expected}, found {actual}")]
    BrokenLink {
        /// Index of the record whose back-link is stale.
        index: usize,
        /// Identity hash of the predecessor.
        expected: RecordHash,
        /// `previous_hash` stored on the record.
        actual: RecordHash,
    },

    /// `records[index].identity_hash` differs from the recomputed digest.
    #[error("hash mismatch at record {index}: stored {stored}, recomputed {recomputed}")]
    HashMismatch {
        /// Index of the inconsistent record.
        index: usize,
        /// Hash stored on the record.
        stored: RecordHash,
        /// Hash recomputed from the record's fields.
        recomputed: RecordHash,
    },

    /// The record's content could not be re-encoded for hashing.
    #[error("record {index} could not be re-encoded: {reason}")]
    Unencodable {
        /// Index of the record.
        index: usize,
        /// Encoding failure message.
        reason: String,
    },
}

impl IntegrityViolation {
    /// Index of the record at which the violation was detected.
    pub fn index(&self) -> usize {
        match self {
            Self::GenesisHashMismatch { .. } => 0,
            Self::BrokenLink { index, .. }
            | Self::HashMismatch { index, .. }
            | Self::Unencodable { index, .. } => *index,
        }
    }
}
