//! # Interactive Menu
//!
//! A numbered command-dispatch loop over one owned chain. Input and output
//! are generic so the loop can be scripted in tests.
//!
//! | Choice | Action                                   |
//! |--------|------------------------------------------|
//! | 1      | Add a new record                         |
//! | 2      | Show the last record                     |
//! | 3      | Show the whole chain                     |
//! | 4      | Verify the chain                         |
//! | 5      | Verify and print the chain               |
//! | 6      | Change the data of a record (tamper)     |
//! | 7      | Show number of records                   |
//! | 8      | Exit                                     |
//!
//! End of input is treated like choice 8. Input bytes that are not valid
//! UTF-8 are replaced with U+FFFD rather than ending the session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tamperlog_core::{Chain, ChainError, Clock};

use crate::render::{write_chain, write_record, write_validity};

const MENU: &str = "\
Ledger Menu:
1. Add a new record.
2. Show the last record.
3. Show the whole chain.
4. Verify the chain.
5. Verify and print the chain.
6. Change data of a particular record.
7. Show number of records.
8. End the session.";

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Append,
    ShowLast,
    ShowChain,
    Verify,
    VerifyAndShow,
    Mutate,
    Count,
    Exit,
}

impl Choice {
    /// Parse a menu line; surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "1" => Some(Self::Append),
            "2" => Some(Self::ShowLast),
            "3" => Some(Self::ShowChain),
            "4" => Some(Self::Verify),
            "5" => Some(Self::VerifyAndShow),
            "6" => Some(Self::Mutate),
            "7" => Some(Self::Count),
            "8" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// The menu loop and the chain it drives.
pub struct Shell<R, W, C> {
    chain: Chain<String, C>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write, C: Clock> Shell<R, W, C> {
    /// A shell over an existing chain.
    pub fn new(chain: Chain<String, C>, input: R, output: W) -> Self {
        Self {
            chain,
            input,
            output,
        }
    }

    /// Read-only access to the driven chain.
    pub fn chain(&self) -> &Chain<String, C> {
        &self.chain
    }

    /// Consume the shell, returning the chain and the output sink.
    pub fn into_parts(self) -> (Chain<String, C>, W) {
        (self.chain, self.output)
    }

    /// Run until choice 8 or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(line) = self.prompt("Enter your choice (1-8): ")? else {
                tracing::debug!("input closed; leaving menu");
                break;
            };
            match Choice::parse(&line) {
                Some(choice) => {
                    if !self.dispatch(choice)? {
                        break;
                    }
                }
                None => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }
        self.output.flush()?;
        Ok(())
    }

    /// Execute one choice. Returns false when the session should end: on
    /// exit, or when input ran out mid-command.
    fn dispatch(&mut self, choice: Choice) -> Result<bool> {
        match choice {
            Choice::Append => {
                let Some(data) = self.prompt("Enter record data: ")? else {
                    return Ok(false);
                };
                match self.chain.append(data) {
                    Ok(_) => writeln!(self.output, "Record added.")?,
                    Err(e) => writeln!(self.output, "Could not add record: {e}")?,
                }
            }
            Choice::ShowLast => {
                let last = self.chain.last().context("chain has no records")?;
                write_record(&mut self.output, last)?;
            }
            Choice::ShowChain => write_chain(&mut self.output, &self.chain)?,
            Choice::Verify => {
                let valid = self.chain.is_valid();
                write_validity(&mut self.output, valid)?;
            }
            Choice::VerifyAndShow => {
                let valid = self.chain.is_valid();
                write_chain(&mut self.output, &self.chain)?;
                write_validity(&mut self.output, valid)?;
            }
            Choice::Mutate => return self.mutate(),
            Choice::Count => {
                writeln!(self.output, "Number of records: {}", self.chain.len())?;
            }
            Choice::Exit => {
                writeln!(self.output, "Exiting...")?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn mutate(&mut self) -> Result<bool> {
        let Some(raw_index) = self.prompt("Enter the record index to modify: ")? else {
            return Ok(false);
        };
        let index: i64 = match raw_index.trim().parse() {
            Ok(i) => i,
            Err(_) => {
                writeln!(self.output, "Invalid index: {:?}", raw_index.trim())?;
                return Ok(true);
            }
        };
        let Some(data) = self.prompt("Enter the new record data: ")? else {
            return Ok(false);
        };
        match self.chain.mutate_payload_at(index, data) {
            Ok(_) => writeln!(self.output, "Record data updated.")?,
            Err(ChainError::IndexOutOfRange { .. }) => {
                writeln!(self.output, "Invalid record index!")?
            }
            Err(e) => writeln!(self.output, "Could not update record: {e}")?,
        }
        Ok(true)
    }

    /// Print `text` and read one line, without its line terminator.
    /// `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let mut line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("input line is not valid UTF-8; replacing invalid bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Run the menu against a fresh chain on the given streams.
pub fn run_menu<C: Clock, R: BufRead, W: Write>(clock: C, input: R, output: W) -> Result<()> {
    let chain = Chain::with_clock(clock).context("failed to seal genesis record")?;
    Shell::new(chain, input, output).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_choices() {
        assert_eq!(Choice::parse("1"), Some(Choice::Append));
        assert_eq!(Choice::parse(" 6 \n"), Some(Choice::Mutate));
        assert_eq!(Choice::parse("8"), Some(Choice::Exit));
        assert_eq!(Choice::parse("9"), None);
        assert_eq!(Choice::parse(""), None);
        assert_eq!(Choice::parse("one"), None);
    }
}
