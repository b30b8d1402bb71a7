//! # tamperlog-core — Hash-Chained Ledger
//!
//! A single-process, in-memory, tamper-evident append log. Each [`Record`]
//! commits to its payload, its creation time, and the identity hash of its
//! predecessor; the [`Chain`] links records in append order and verifies the
//! whole sequence end-to-end.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every identity hash is computed over
//!    `CanonicalBytes`, produced by a single JCS (RFC 8785) pipeline. No raw
//!    `serde_json::to_vec()` for digests.
//!
//! 2. **Non-circular identity.** A record's hash covers exactly
//!    `{created_at, payload, previous_hash}` and never the hash field itself.
//!
//! 3. **Injected time.** Timestamps come from a [`Clock`] supplied at chain
//!    construction, so hashing is reproducible under test.
//!
//! 4. **Exclusive ownership.** The chain hands out `&Record` views only. The
//!    one way to change a record after sealing is
//!    [`Chain::mutate_payload`], which exists to simulate tampering.
//!
//! ## Crate Policy
//!
//! - No I/O, no randomness, no internal locking. A concurrent host must wrap
//!   the chain in its own mutual exclusion.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod chain;
pub mod clock;
pub mod digest;
pub mod error;
pub mod record;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use chain::{Chain, GenesisPayload, GENESIS_MARKER};
pub use clock::{Clock, ManualClock, SystemClock};
pub use digest::{sha256_digest, RecordHash};
pub use error::{CanonicalizationError, ChainError, DigestError, IntegrityViolation, TimestampError};
pub use record::Record;
pub use temporal::Timestamp;
