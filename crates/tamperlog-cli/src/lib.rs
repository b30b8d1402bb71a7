//! # tamperlog-cli — Hash Chain Shell
//!
//! The driving shell around `tamperlog-core`. It owns a single chain for the
//! lifetime of the process; nothing is persisted.
//!
//! ## Subcommands
//!
//! - `menu`: numbered interactive menu (default)
//! - `show`: build a chain from `--append` payloads and print it
//! - `demo`: scripted tamper-detection walkthrough on a deterministic clock
//!
//! ## Crate Policy
//!
//! - Argument parsing lives next to each handler; `main.rs` only dispatches.
//! - Handlers take generic readers/writers so they run under test without a
//!   terminal.
//! - Chain semantics stay in `tamperlog-core`.

pub mod demo;
pub mod render;
pub mod shell;
pub mod show;
