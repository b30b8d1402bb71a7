//! # Hash Chain
//!
//! An ordered, append-only sequence of [`Record`]s. Index 0 is the genesis
//! record, created unconditionally at construction with the genesis marker
//! payload and the all-zero sentinel as its `previous_hash`. Every later
//! record links to the identity hash of the record before it.
//!
//! ## Verification
//!
//! For each index `i` in ascending order:
//!
//! - `i == 0`: the genesis record must be self-consistent. Link-only
//!   verification starts at index 1 and would miss a stale genesis hash.
//! - `i >= 1`: `records[i].previous_hash == records[i - 1].identity_hash`,
//!   then `records[i].identity_hash == records[i].recompute_hash()`.
//!
//! The first failure is reported and the scan stops.
//!
//! ## Tamper Simulation
//!
//! [`Chain::mutate_payload`] rewrites a record's payload and re-seals that
//! record's hash, leaving the successor's `previous_hash` stale. The break is
//! detected at the boundary `i -> i + 1`. Mutating the **last** record has no
//! successor to expose it, so the chain still verifies. This blind spot is
//! inherent to back-linked chains and is kept as-is.

use serde::Serialize;

use crate::canonical::CanonicalBytes;
use crate::clock::{Clock, SystemClock};
use crate::digest::RecordHash;
use crate::error::{ChainError, IntegrityViolation};
use crate::record::Record;

/// Payload of the genesis record.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// Payload types that can produce the genesis marker.
pub trait GenesisPayload {
    /// The payload stored in the genesis record.
    fn genesis() -> Self;
}

impl GenesisPayload for String {
    fn genesis() -> Self {
        GENESIS_MARKER.to_string()
    }
}

impl GenesisPayload for serde_json::Value {
    fn genesis() -> Self {
        serde_json::Value::String(GENESIS_MARKER.to_string())
    }
}

/// A hash-chained ledger exclusively owning its records.
#[derive(Debug)]
pub struct Chain<P, C = SystemClock> {
    records: Vec<Record<P>>,
    clock: C,
}

impl<P: Serialize + GenesisPayload> Chain<P, SystemClock> {
    /// A chain seeded with the genesis record, timestamped by the wall clock.
    pub fn new() -> Result<Self, ChainError> {
        Self::with_clock(SystemClock::new())
    }
}

impl<P: Serialize + GenesisPayload, C: Clock> Chain<P, C> {
    /// A chain seeded with the genesis record, timestamped by `clock`.
    pub fn with_clock(clock: C) -> Result<Self, ChainError> {
        Self::with_genesis(P::genesis(), clock)
    }
}

impl<P: Serialize, C: Clock> Chain<P, C> {
    /// A chain whose genesis record carries `payload`.
    ///
    /// # Errors
    ///
    /// [`ChainError::Encoding`] if `payload` has no canonical encoding; no
    /// chain is produced in that case, so an empty chain is never observed.
    pub fn with_genesis(payload: P, mut clock: C) -> Result<Self, ChainError> {
        let genesis = Record::new(payload, RecordHash::GENESIS_SENTINEL, clock.now())?;
        tracing::debug!(hash = %genesis.identity_hash(), "sealed genesis record");
        Ok(Self {
            records: vec![genesis],
            clock,
        })
    }

    /// Append a record linked to the current last record.
    ///
    /// # Errors
    ///
    /// [`ChainError::Encoding`] if `payload` has no canonical encoding. The
    /// chain is left exactly as it was and the clock is not read.
    pub fn append(&mut self, payload: P) -> Result<&Record<P>, ChainError> {
        let previous_hash = *self.last()?.identity_hash();
        // The other preimage fields always encode, so a payload that
        // canonicalizes here cannot fail inside `Record::new`.
        CanonicalBytes::new(&payload)?;
        let record = Record::new(payload, previous_hash, self.clock.now())?;
        tracing::debug!(
            index = self.records.len(),
            hash = %record.identity_hash(),
            previous = %previous_hash,
            "appended record"
        );
        self.records.push(record);
        self.last()
    }

    /// Rewrite the payload of `records[index]` and re-seal that record's
    /// hash. Returns the replaced payload.
    ///
    /// The successor's `previous_hash` is deliberately left pointing at the
    /// superseded hash.
    ///
    /// # Errors
    ///
    /// - [`ChainError::IndexOutOfRange`] if `index >= len()`.
    /// - [`ChainError::Encoding`] if `payload` has no canonical encoding.
    ///
    /// On error the chain is unchanged.
    pub fn mutate_payload(&mut self, index: usize, payload: P) -> Result<P, ChainError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(ChainError::IndexOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len,
            })?;
        let before = *record.identity_hash();
        let old = record.replace_payload(payload)?;
        tracing::warn!(
            index,
            old_hash = %before,
            new_hash = %record.identity_hash(),
            "record payload mutated"
        );
        Ok(old)
    }

    /// [`Chain::mutate_payload`] for a raw signed index, e.g. parsed from
    /// user input. Negative indices fail with [`ChainError::IndexOutOfRange`].
    pub fn mutate_payload_at(&mut self, index: i64, payload: P) -> Result<P, ChainError> {
        let resolved = usize::try_from(index).map_err(|_| ChainError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })?;
        self.mutate_payload(resolved, payload)
    }

    /// Verify the whole chain, reporting the earliest violation.
    ///
    /// No side effects beyond logging; idempotent.
    pub fn verify(&self) -> Result<(), IntegrityViolation> {
        let result = self.scan();
        if let Err(violation) = &result {
            tracing::warn!(index = violation.index(), "chain verification failed: {violation}");
        }
        result
    }

    /// `verify().is_ok()`.
    pub fn is_valid(&self) -> bool {
        self.verify().is_ok()
    }

    fn scan(&self) -> Result<(), IntegrityViolation> {
        let Some(genesis) = self.records.first() else {
            return Ok(());
        };
        let recomputed = recompute(0, genesis)?;
        if recomputed != *genesis.identity_hash() {
            return Err(IntegrityViolation::GenesisHashMismatch {
                stored: *genesis.identity_hash(),
                recomputed,
            });
        }

        for (index, pair) in self.records.windows(2).enumerate() {
            let (prev, current) = (&pair[0], &pair[1]);
            let index = index + 1;

            if current.previous_hash() != prev.identity_hash() {
                return Err(IntegrityViolation::BrokenLink {
                    index,
                    expected: *prev.identity_hash(),
                    actual: *current.previous_hash(),
                });
            }

            let recomputed = recompute(index, current)?;
            if recomputed != *current.identity_hash() {
                return Err(IntegrityViolation::HashMismatch {
                    index,
                    stored: *current.identity_hash(),
                    recomputed,
                });
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn record_mut(&mut self, index: usize) -> &mut Record<P> {
        &mut self.records[index]
    }
}

fn recompute<P: Serialize>(
    index: usize,
    record: &Record<P>,
) -> Result<RecordHash, IntegrityViolation> {
    record
        .recompute_hash()
        .map_err(|e| IntegrityViolation::Unencodable {
            index,
            reason: e.to_string(),
        })
}

impl<P, C> Chain<P, C> {
    /// The most recently appended record.
    ///
    /// # Errors
    ///
    /// [`ChainError::EmptyChain`] only for a chain with no records, which
    /// the constructors never produce.
    pub fn last(&self) -> Result<&Record<P>, ChainError> {
        self.records.last().ok_or(ChainError::EmptyChain)
    }

    /// The record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Record<P>> {
        self.records.get(index)
    }

    /// Number of records, genesis included. O(1).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed chain.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view over all records in chain order.
    pub fn records(&self) -> &[Record<P>] {
        &self.records
    }

    /// Iterate records in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record<P>> {
        self.records.iter()
    }

    /// The timestamp source.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<'a, P, C> IntoIterator for &'a Chain<P, C> {
    type Item = &'a Record<P>;
    type IntoIter = std::slice::Iter<'a, Record<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
