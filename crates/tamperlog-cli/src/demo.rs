//! # Demo Subcommand
//!
//! Walks through tamper detection on a deterministic clock: genesis, two
//! appends, an interior tamper, a restore, the last-record blind spot, and
//! rejected out-of-range mutations. Each step prints the observed verdict
//! next to the expected one.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Args;
use tamperlog_core::{Chain, ChainError, ManualClock, Timestamp};

/// Arguments for the `tamperlog demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Timestamp of the genesis record (RFC 3339, `Z` suffix).
    #[arg(long, default_value = "2026-01-01T00:00:00Z")]
    pub start: String,

    /// Clock advance between records, in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub step_ms: u32,
}

struct Walkthrough<'a, W> {
    chain: Chain<String, ManualClock>,
    out: &'a mut W,
    mismatches: usize,
}

impl<W: Write> Walkthrough<'_, W> {
    fn check(&mut self, step: &str, expect_valid: bool) -> Result<()> {
        let verdict = self.chain.verify();
        let valid = verdict.is_ok();
        let mark = if valid == expect_valid { "ok" } else { "UNEXPECTED" };
        if valid != expect_valid {
            self.mismatches += 1;
        }
        writeln!(
            self.out,
            "{step:<40} length {} valid {valid:<5} (expected {expect_valid}) [{mark}]",
            self.chain.len()
        )?;
        if let Err(violation) = verdict {
            writeln!(self.out, "    {violation}")?;
        }
        Ok(())
    }

    fn append(&mut self, payload: &str) -> Result<()> {
        self.chain
            .append(payload.to_string())
            .with_context(|| format!("failed to append {payload:?}"))?;
        self.check(&format!("append {payload:?}"), true)
    }

    fn mutate(&mut self, index: i64, payload: &str, expect_valid: bool) -> Result<()> {
        self.chain
            .mutate_payload_at(index, payload.to_string())
            .with_context(|| format!("failed to mutate record {index}"))?;
        self.check(&format!("mutate [{index}] -> {payload:?}"), expect_valid)
    }

    fn reject(&mut self, index: i64) -> Result<()> {
        let outcome = self.chain.mutate_payload_at(index, "X".to_string());
        let rejected = matches!(outcome, Err(ChainError::IndexOutOfRange { .. }));
        if !rejected {
            self.mismatches += 1;
        }
        writeln!(
            self.out,
            "{:<40} rejected {rejected} (expected true) [{}]",
            format!("mutate [{index}]"),
            if rejected { "ok" } else { "UNEXPECTED" }
        )?;
        Ok(())
    }
}

/// Run the walkthrough. Returns exit code 0 when every step behaved as
/// expected, 1 otherwise.
pub fn run_demo<W: Write>(args: &DemoArgs, out: &mut W) -> Result<u8> {
    let start = Timestamp::parse(&args.start)
        .with_context(|| format!("invalid --start {:?}", args.start))?;
    let clock = ManualClock::new(start, Duration::milliseconds(i64::from(args.step_ms)));
    let chain = Chain::with_clock(clock).context("failed to seal genesis record")?;

    let mut walk = Walkthrough {
        chain,
        out,
        mismatches: 0,
    };
    walk.check("genesis", true)?;
    walk.append("A")?;
    walk.append("B")?;
    walk.mutate(1, "A-tampered", false)?;
    walk.mutate(1, "A", true)?;
    let last = walk.chain.len() as i64 - 1;
    walk.mutate(last, "B-tampered", true)?;
    walk.reject(-1)?;
    walk.reject(walk.chain.len() as i64)?;

    let mismatches = walk.mismatches;
    writeln!(walk.out, "{mismatches} unexpected result(s)")?;
    tracing::info!(mismatches, "demo finished");
    Ok(if mismatches == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_clean() {
        let args = DemoArgs {
            start: "2026-01-01T00:00:00Z".into(),
            step_ms: 1_000,
        };
        let mut out = Vec::<u8>::new();
        assert_eq!(run_demo(&args, &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("UNEXPECTED"));
        assert!(text.contains("broken link at record 2"));
        assert!(text.ends_with("0 unexpected result(s)\n"));
    }

    #[test]
    fn demo_runs_on_frozen_clock() {
        let args = DemoArgs {
            start: "2026-01-01T00:00:00Z".into(),
            step_ms: 0,
        };
        let mut out = Vec::<u8>::new();
        assert_eq!(run_demo(&args, &mut out).unwrap(), 0);
    }

    #[test]
    fn demo_rejects_bad_start() {
        let args = DemoArgs {
            start: "2026-01-01T00:00:00+01:00".into(),
            step_ms: 1_000,
        };
        assert!(run_demo(&args, &mut Vec::<u8>::new()).is_err());
    }
}
