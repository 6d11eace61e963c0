//! Strict quote checking for CSV input
//!
//! The `csv` crate accepts stray quotes and lets an unclosed quoted field
//! run to the end of input. [`QuoteCheck`] sits between the file and the
//! CSV reader, follows RFC 4180 quoting over the raw bytes, and remembers
//! the first violation and the line it was on.

use std::io::{self, Read};
use thiserror::Error;

/// A quoting violation in the raw input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFault {
    #[error("bare \" in non-quoted field")]
    BareQuote,

    #[error("extraneous \" after quoted field")]
    ExtraneousQuote,

    #[error("quoted field is never closed")]
    Unclosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// Just saw a `"` inside a quoted field
    QuoteInQuoted,
}

/// Pass-through reader that records the first quoting violation
pub struct QuoteCheck<R> {
    inner: R,
    state: State,
    line: u64,
    /// Line where the current quoted field opened
    open_line: u64,
    fault: Option<(u64, QuoteFault)>,
}

impl<R> QuoteCheck<R> {
    pub fn new(inner: R) -> Self {
        QuoteCheck {
            inner,
            state: State::FieldStart,
            line: 1,
            open_line: 1,
            fault: None,
        }
    }

    /// First violation seen so far, with its 1-based line
    pub fn fault(&self) -> Option<(u64, QuoteFault)> {
        self.fault
    }

    fn scan(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.fault.is_some() {
                return;
            }

            self.state = match (self.state, b) {
                (State::FieldStart, b'"') => {
                    self.open_line = self.line;
                    State::Quoted
                }
                (State::Unquoted, b'"') => {
                    self.fault = Some((self.line, QuoteFault::BareQuote));
                    State::Unquoted
                }
                (State::FieldStart | State::Unquoted, b',' | b'\n') => State::FieldStart,
                (State::FieldStart | State::Unquoted, _) => State::Unquoted,
                (State::Quoted, b'"') => State::QuoteInQuoted,
                (State::Quoted, _) => State::Quoted,
                (State::QuoteInQuoted, b'"') => State::Quoted,
                (State::QuoteInQuoted, b',' | b'\n') => State::FieldStart,
                (State::QuoteInQuoted, b'\r') => State::Unquoted,
                (State::QuoteInQuoted, _) => {
                    self.fault = Some((self.line, QuoteFault::ExtraneousQuote));
                    State::Unquoted
                }
            };

            if b == b'\n' {
                self.line += 1;
            }
        }
    }

    fn finish(&mut self) {
        if self.fault.is_none() && self.state == State::Quoted {
            self.fault = Some((self.open_line, QuoteFault::Unclosed));
        }
    }
}

impl<R: Read> Read for QuoteCheck<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            self.finish();
        } else {
            self.scan(&buf[..n]);
        }
        Ok(n)
    }
}
