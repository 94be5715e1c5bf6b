//! The incremental byte cursor: one-byte lookahead over a [`ByteSource`], with line/column/offset
//! tracking for error reporting.

use crate::error::{ParseError, ParseErrorKind};
use crate::parser::source::ByteSource;
use std::io;

/// Size of the internal refill buffer used for file and callback sources, matching §4.5's
/// "4096-byte internal buffer".
const BUF_SIZE: usize = 4096;

/// A location within the input, captured at the start of a token so an error can report both
/// where the token began and where the parser actually noticed the problem.
#[derive(Debug, Copy, Clone)]
pub struct Mark {
    line: usize,
    column: usize,
}

/// Reads one byte of lookahead at a time from a [`ByteSource`], refilling an internal buffer as
/// needed and tracking the line, column, and byte offset of the current position.
pub struct Cursor<S> {
    source: S,
    source_name: String,
    buf: Box<[u8; BUF_SIZE]>,
    pos: usize,
    filled: usize,
    current: Option<u8>,
    line: usize,
    column: usize,
    offset: u64,
}

impl<S: ByteSource> Cursor<S> {
    /// Creates a cursor over `source` and loads its first byte of lookahead.
    pub fn new(source: S, source_name: String) -> Result<Self, ParseError> {
        let mut cur = Cursor {
            source,
            source_name,
            buf: Box::new([0u8; BUF_SIZE]),
            pos: 0,
            filled: 0,
            current: None,
            line: 0,
            column: 0,
            offset: 0,
        };
        let first = cur.next_raw().map_err(|e| cur.io_err(e))?;
        cur.current = first;
        Ok(cur)
    }

    fn refill(&mut self) -> io::Result<()> {
        if self.pos >= self.filled {
            self.filled = self.source.fill(&mut self.buf[..])?;
            self.pos = 0;
        }
        Ok(())
    }

    fn next_raw(&mut self) -> io::Result<Option<u8>> {
        self.refill()?;
        if self.pos < self.filled {
            let b = self.buf[self.pos];
            self.pos += 1;
            Ok(Some(b))
        } else {
            Ok(None)
        }
    }

    /// The current lookahead byte, or `None` at end of input.
    pub fn peek(&self) -> Option<u8> {
        self.current
    }

    /// Consumes the current lookahead byte and loads the next one, advancing line/column/offset.
    pub fn advance(&mut self) -> Result<(), ParseError> {
        if let Some(b) = self.current {
            self.offset += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.current = self.next_raw().map_err(|e| self.io_err(e))?;
        Ok(())
    }

    /// Skips space, tab, CR, LF, VT, and FF, per §4.5's whitespace set.
    pub fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            match self.current {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') | Some(0x0B) | Some(0x0C) => {
                    self.advance()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Captures the current position, for later use as an error's token-start location.
    pub fn mark(&self) -> Mark {
        Mark { line: self.line, column: self.column }
    }

    /// Builds a [`ParseError`] at the current position, reporting `start` as where the offending
    /// token began.
    pub fn err(&self, kind: ParseErrorKind, message: impl Into<String>, start: Mark) -> ParseError {
        ParseError {
            source: self.source_name.clone(),
            message: message.into(),
            kind,
            line: self.line,
            column: self.column,
            prev_line: start.line,
            prev_column: start.column,
            offset: self.offset,
        }
    }

    /// Builds a [`ParseError`] whose token-start location is the current position, for errors
    /// that have no earlier "start of token" to report (e.g. the first byte of input).
    pub fn err_here(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        self.err(kind, message, self.mark())
    }

    fn io_err(&self, e: io::Error) -> ParseError {
        self.err_here(ParseErrorKind::Io, format!("I/O error reading input: {e}"))
    }
}
