//! Scripted sessions against the interactive menu.

use std::io::Cursor;

use chrono::Duration;
use tamperlog_cli::shell::{run_menu, Shell};
use tamperlog_core::{Chain, ManualClock, Timestamp};

fn clock() -> ManualClock {
    ManualClock::new(
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
        Duration::seconds(1),
    )
}

/// Feed `script` to a fresh shell; return the final chain and everything printed.
fn session(script: &str) -> (Chain<String, ManualClock>, String) {
    let chain = Chain::with_clock(clock()).unwrap();
    let mut shell = Shell::new(chain, Cursor::new(script.to_string()), Vec::<u8>::new());
    shell.run().unwrap();
    let (chain, out) = shell.into_parts();
    (chain, String::from_utf8(out).unwrap())
}

#[test]
fn append_then_count() {
    let (chain, out) = session("1\nhello world\n1\nsecond\n7\n8\n");
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.last().unwrap().payload(), "second");
    assert_eq!(out.matches("Record added.").count(), 2);
    assert!(out.contains("Number of records: 3"));
    assert!(out.trim_end().ends_with("Exiting..."));
}

#[test]
fn show_last_record() {
    let (chain, out) = session("1\nA\n2\n8\n");
    let last = chain.last().unwrap();
    assert!(out.contains("Data: A\n"));
    assert!(out.contains(&format!("Timestamp: {}\n", last.created_at())));
    assert!(out.contains(&format!("Previous Hash: {}\n", last.previous_hash())));
    assert!(out.contains(&format!("Hash: {}\n", last.identity_hash())));
}

#[test]
fn tamper_detected_then_restored() {
    let (chain, out) = session("1\nA\n1\nB\n4\n6\n1\nA-tampered\n4\n6\n1\nA\n4\n8\n");
    let verdicts: Vec<&str> = out
        .lines()
        .filter(|l| l.starts_with("Chain valid:"))
        .collect();
    assert_eq!(
        verdicts,
        ["Chain valid: true", "Chain valid: false", "Chain valid: true"]
    );
    assert_eq!(out.matches("Record data updated.").count(), 2);
    assert!(chain.is_valid());
}

#[test]
fn verify_and_print_lists_every_record() {
    let (_, out) = session("1\nA\n5\n8\n");
    assert!(out.contains("Record 0:\nData: Genesis Block\n"));
    assert!(out.contains("Record 1:\nData: A\n"));
    assert!(out.contains("Chain valid: true"));
}

#[test]
fn show_whole_chain() {
    let (_, out) = session("1\nA\n1\nB\n3\n8\n");
    assert!(out.contains("Record 2:\nData: B\n"));
    assert!(!out.contains("Chain valid:"));
}

#[test]
fn out_of_range_and_malformed_indices() {
    let (chain, out) = session("6\n-1\nX\n6\n1\nX\n6\nabc\n7\n8\n");
    assert_eq!(out.matches("Invalid record index!").count(), 2);
    assert!(out.contains("Invalid index: \"abc\""));
    assert!(!out.contains("Record data updated."));
    assert_eq!(chain.len(), 1);
    assert!(chain.is_valid());
}

#[test]
fn invalid_choice_reprompts() {
    let (_, out) = session("9\n\nfoo\n8\n");
    assert_eq!(out.matches("Invalid choice, please try again.").count(), 3);
}

#[test]
fn end_of_input_exits_cleanly() {
    let (chain, out) = session("1\nA\n");
    assert_eq!(chain.len(), 2);
    assert!(!out.contains("Exiting..."));

    // Input closes in the middle of a command.
    let (chain, _) = session("1\n");
    assert_eq!(chain.len(), 1);
}

#[test]
fn non_utf8_input_does_not_end_session() {
    let mut script = b"1\n".to_vec();
    script.extend_from_slice(&[0xff, 0xfe, b'\n']);
    script.extend_from_slice(&[0xff, b'\n']);
    script.extend_from_slice(b"7\n8\n");

    let chain = Chain::with_clock(clock()).unwrap();
    let mut shell = Shell::new(chain, Cursor::new(script), Vec::<u8>::new());
    shell.run().unwrap();
    let (chain, out) = shell.into_parts();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.last().unwrap().payload(), "\u{fffd}\u{fffd}");
    assert!(chain.is_valid());
    assert!(out.contains("Invalid choice, please try again."));
    assert!(out.contains("Number of records: 2"));
    assert!(out.trim_end().ends_with("Exiting..."));
}

#[test]
fn payload_keeps_inner_whitespace() {
    let (chain, _) = session("1\n  padded payload  \r\n8\n");
    assert_eq!(chain.last().unwrap().payload(), "  padded payload  ");
}

#[test]
fn run_menu_on_fresh_chain() {
    let mut out = Vec::<u8>::new();
    run_menu(clock(), Cursor::new("7\n8\n"), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Number of records: 1"));
    assert!(text.contains("Ledger Menu:"));
}
