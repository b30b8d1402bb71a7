//! # tamperlog CLI entry point
//!
//! Parses command-line arguments, installs logging, and dispatches to the
//! subcommand handlers.

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tamperlog_cli::demo::{run_demo, DemoArgs};
use tamperlog_cli::shell::run_menu;
use tamperlog_cli::show::{run_show, ShowArgs};
use tamperlog_core::SystemClock;

/// Tamper-evident, in-memory hash chain.
///
/// Every record commits to its payload, its timestamp, and the hash of the
/// record before it. Nothing is persisted: the chain lives as long as the
/// process.
#[derive(Parser, Debug)]
#[command(name = "tamperlog", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive numbered menu (default).
    Menu,

    /// Build a chain from payloads and print it.
    Show(ShowArgs),

    /// Scripted tamper-detection walkthrough.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    tracing::debug!("tamperlog v{} starting", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout();
    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            run_menu(SystemClock::new(), io::stdin().lock(), stdout.lock()).map(|()| 0)
        }
        Commands::Show(args) => run_show(&args, SystemClock::new(), &mut stdout.lock()),
        Commands::Demo(args) => run_demo(&args, &mut stdout.lock()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_menu() {
        let cli = Cli::try_parse_from(["tamperlog"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parse_show() {
        let cli = Cli::try_parse_from([
            "tamperlog", "-vv", "show", "--append", "A", "--append", "B", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.payloads, ["A", "B"]);
                assert!(args.json);
            }
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_demo_defaults() {
        let cli = Cli::try_parse_from(["tamperlog", "demo"]).unwrap();
        match cli.command {
            Some(Commands::Demo(args)) => {
                assert_eq!(args.start, "2026-01-01T00:00:00Z");
                assert_eq!(args.step_ms, 1_000);
            }
            other => panic!("expected demo, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_negative_demo_step() {
        assert!(Cli::try_parse_from(["tamperlog", "demo", "--step-ms=-1000"]).is_err());
        assert!(
            Cli::try_parse_from(["tamperlog", "demo", "--step-ms=-9223372036854775808"]).is_err()
        );
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["tamperlog", "mine"]).is_err());
    }
}
