//! # Show Subcommand
//!
//! Builds a chain from `--append` payloads and prints it with its
//! verification verdict, as text or JSON.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tamperlog_core::{Chain, Clock};

use crate::render::{write_chain, write_chain_json, write_validity};

/// Arguments for the `tamperlog show` subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Payload to append after genesis. Repeat for more records.
    #[arg(long = "append", value_name = "PAYLOAD")]
    pub payloads: Vec<String>,

    /// Emit the records as a JSON array instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Build the chain and print it. Returns exit code 0 when the chain
/// verifies, 1 otherwise.
pub fn run_show<C: Clock, W: Write>(args: &ShowArgs, clock: C, out: &mut W) -> Result<u8> {
    let mut chain: Chain<String, C> =
        Chain::with_clock(clock).context("failed to seal genesis record")?;
    for payload in &args.payloads {
        chain
            .append(payload.clone())
            .with_context(|| format!("failed to append {payload:?}"))?;
    }
    tracing::info!(records = chain.len(), "chain built");

    let valid = chain.is_valid();
    if args.json {
        write_chain_json(out, &chain)?;
    } else {
        write_chain(out, &chain)?;
        write_validity(out, valid)?;
    }
    Ok(if valid { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tamperlog_core::{ManualClock, Timestamp};

    fn clock() -> ManualClock {
        ManualClock::new(
            Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            Duration::seconds(1),
        )
    }

    #[test]
    fn text_output() {
        let args = ShowArgs {
            payloads: vec!["A".into(), "B".into()],
            json: false,
        };
        let mut out = Vec::new();
        assert_eq!(run_show(&args, clock(), &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Record 2:\nData: B\n"));
        assert!(text.ends_with("Chain valid: true\n"));
    }

    #[test]
    fn json_output() {
        let args = ShowArgs {
            payloads: vec!["A".into()],
            json: true,
        };
        let mut out = Vec::new();
        assert_eq!(run_show(&args, clock(), &mut out).unwrap(), 0);
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }
}
