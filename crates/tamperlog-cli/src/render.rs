//! # Rendering
//!
//! Human-readable and JSON output for records and chains.

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;
use tamperlog_core::{Chain, Record};

/// Separator printed after each record in a chain listing.
pub const SEPARATOR: &str = "-------------------------";

/// Write one record's fields, one per line.
pub fn write_record<W: Write, P: Display>(out: &mut W, record: &Record<P>) -> io::Result<()> {
    writeln!(out, "Data: {}", record.payload())?;
    writeln!(out, "Timestamp: {}", record.created_at())?;
    writeln!(out, "Previous Hash: {}", record.previous_hash())?;
    writeln!(out, "Hash: {}", record.identity_hash())
}

/// Write every record with its index header and a trailing separator.
pub fn write_chain<W: Write, P: Display, C>(out: &mut W, chain: &Chain<P, C>) -> io::Result<()> {
    for (idx, record) in chain.iter().enumerate() {
        writeln!(out, "Record {idx}:")?;
        write_record(out, record)?;
        writeln!(out, "{SEPARATOR}")?;
    }
    Ok(())
}

/// Write the verification verdict line.
pub fn write_validity<W: Write>(out: &mut W, valid: bool) -> io::Result<()> {
    writeln!(out, "Chain valid: {valid}")
}

/// Pretty-printed JSON array of all records, newline-terminated.
pub fn write_chain_json<W: Write, P: Serialize, C>(
    out: &mut W,
    chain: &Chain<P, C>,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, chain.records())?;
    writeln!(out)
}
