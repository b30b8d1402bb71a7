//! # Records
//!
//! A `Record` holds a caller-supplied payload, the identity hash of its
//! predecessor, its creation time, and its own identity hash:
//!
//! ```text
//! identity_hash = SHA256(JCS({"created_at", "payload", "previous_hash"}))
//! ```
//!
//! The hash field is never part of its own preimage.
//!
//! ## Integrity Invariant
//!
//! `identity_hash == recompute_hash()` holds after construction. The only
//! way to change a sealed record is the crate-internal
//! [`Record::replace_payload`], which re-establishes the invariant for the
//! record itself while leaving the successor's back-link stale.

use serde::Serialize;

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, RecordHash};
use crate::error::ChainError;
use crate::temporal::Timestamp;

/// The fields committed by an identity hash. Field names are the canonical
/// JSON keys.
#[derive(Serialize)]
struct HashPreimage<'a, P: Serialize> {
    created_at: &'a Timestamp,
    payload: &'a P,
    previous_hash: &'a RecordHash,
}

fn compute_identity<P: Serialize>(
    payload: &P,
    previous_hash: &RecordHash,
    created_at: &Timestamp,
) -> Result<RecordHash, ChainError> {
    let preimage = HashPreimage {
        created_at,
        payload,
        previous_hash,
    };
    let canonical = CanonicalBytes::new(&preimage)?;
    Ok(sha256_digest(&canonical))
}

/// A single sealed entry of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record<P> {
    payload: P,
    previous_hash: RecordHash,
    created_at: Timestamp,
    identity_hash: RecordHash,
}

impl<P: Serialize> Record<P> {
    /// Seal a new record.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Encoding`] if `payload` has no canonical
    /// encoding (a float anywhere in it, or a non-JSON shape).
    pub fn new(
        payload: P,
        previous_hash: RecordHash,
        created_at: Timestamp,
    ) -> Result<Self, ChainError> {
        let identity_hash = compute_identity(&payload, &previous_hash, &created_at)?;
        Ok(Self {
            payload,
            previous_hash,
            created_at,
            identity_hash,
        })
    }

    /// Recompute the identity hash from the current payload, previous hash
    /// and creation time. Pure; byte-for-byte reproducible.
    pub fn recompute_hash(&self) -> Result<RecordHash, ChainError> {
        compute_identity(&self.payload, &self.previous_hash, &self.created_at)
    }

    /// Whether the stored hash matches the content. Encoding failure counts
    /// as inconsistent.
    pub fn is_self_consistent(&self) -> bool {
        matches!(self.recompute_hash(), Ok(h) if h == self.identity_hash)
    }

    /// Swap in a new payload and re-seal the hash. Returns the old payload.
    ///
    /// The new hash is computed before anything is written, so an encoding
    /// failure leaves the record untouched.
    pub(crate) fn replace_payload(&mut self, payload: P) -> Result<P, ChainError> {
        let identity_hash = compute_identity(&payload, &self.previous_hash, &self.created_at)?;
        self.identity_hash = identity_hash;
        Ok(std::mem::replace(&mut self.payload, payload))
    }

    #[cfg(test)]
    pub(crate) fn overwrite_identity_hash(&mut self, hash: RecordHash) {
        self.identity_hash = hash;
    }
}

impl<P> Record<P> {
    /// The caller-supplied payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Identity hash of the predecessor, or the genesis sentinel.
    pub fn previous_hash(&self) -> &RecordHash {
        &self.previous_hash
    }

    /// Creation time captured when the record was sealed.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// The stored identity hash.
    pub fn identity_hash(&self) -> &RecordHash {
        &self.identity_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn ts() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    #[test]
    fn identical_content_identical_hash() {
        let a = Record::new("A".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        let b = Record::new("A".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        assert_eq!(a.identity_hash(), b.identity_hash());
    }

    #[test]
    fn hash_matches_canonical_preimage() {
        let r = Record::new("A".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        let expected = serde_json::json!({
            "payload": "A",
            "previous_hash": "0".repeat(64),
            "created_at": "2026-01-15T12:00:00.000000Z",
        });
        let cb = CanonicalBytes::new(&expected).unwrap();
        assert_eq!(*r.identity_hash(), sha256_digest(&cb));
    }

    #[test]
    fn each_field_changes_the_hash() {
        let base = Record::new("A".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        let other_payload =
            Record::new("B".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        let other_prev = Record::new("A".to_string(), *base.identity_hash(), ts()).unwrap();
        let other_time = Record::new(
            "A".to_string(),
            RecordHash::GENESIS_SENTINEL,
            ts().saturating_add(chrono::Duration::microseconds(1)),
        )
        .unwrap();
        assert_ne!(base.identity_hash(), other_payload.identity_hash());
        assert_ne!(base.identity_hash(), other_prev.identity_hash());
        assert_ne!(base.identity_hash(), other_time.identity_hash());
    }

    #[test]
    fn structured_payload_supported() {
        let mut payload = BTreeMap::new();
        payload.insert("amount", 42);
        payload.insert("account", 7);
        let r = Record::new(payload, RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        assert!(r.is_self_consistent());
    }

    #[test]
    fn float_payload_is_encoding_error() {
        let result = Record::new(1.5f64, RecordHash::GENESIS_SENTINEL, ts());
        assert!(matches!(result, Err(ChainError::Encoding(_))));
    }

    #[test]
    fn replace_payload_reseals() {
        let mut r = Record::new("A".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        let before = *r.identity_hash();
        let old = r.replace_payload("X".to_string()).unwrap();
        assert_eq!(old, "A");
        assert_ne!(*r.identity_hash(), before);
        assert!(r.is_self_consistent());
        assert_eq!(r.created_at(), &ts());
    }

    #[test]
    fn replace_payload_failure_leaves_record_untouched() {
        let mut r =
            Record::new(serde_json::json!("A"), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        let snapshot = r.clone();
        assert!(r.replace_payload(serde_json::json!({"x": 0.5})).is_err());
        assert_eq!(r, snapshot);
    }

    #[test]
    fn overwritten_hash_is_inconsistent() {
        let mut r = Record::new("A".to_string(), RecordHash::GENESIS_SENTINEL, ts()).unwrap();
        r.overwrite_identity_hash(RecordHash::from_bytes([7u8; 32]));
        assert!(!r.is_self_consistent());
    }
}
