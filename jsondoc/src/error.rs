//! The error model: error kinds, and the line/column/offset-carrying [`ParseError`] and
//! [`SerializeError`] types.
//!
//! Neither type derives from `thiserror`; both implement [`std::error::Error`] and
//! [`std::fmt::Display`] by hand, matching the teacher's own `ParserError` in
//! `codeview/src/parser.rs`.

use std::fmt;

/// The taxonomy of ways a parse can fail, per §7.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// Input ended while a value, string, or number was still incomplete.
    UnexpectedEof,
    /// An unrecognized `\` escape sequence in a string.
    InvalidEscape,
    /// A `\u` escape's hex digits weren't valid hex.
    InvalidHexDigit,
    /// A byte sequence in a string was not valid UTF-8.
    InvalidUtf8,
    /// A UTF-8 sequence encoded a code point using more bytes than necessary.
    OverlongUtf8,
    /// An unescaped ASCII control character (`0x00..=0x1F`) appeared inside a string.
    UnescapedControlChar,
    /// A `\u` escape held a UTF-16 surrogate that wasn't validly paired.
    UnpairedSurrogate,
    /// A decoded code point exceeded `U+10FFFF`.
    CodepointTooLarge,
    /// A decoded code point otherwise could not be represented (e.g. landed in the surrogate
    /// range via a raw UTF-8 byte sequence, which is never valid).
    InvalidCodepoint,
    /// A number's whole part had a leading zero followed by another digit.
    LeadingZero,
    /// A number was cut short after `.` or `e`/`E` with no digits following.
    TruncatedNumber,
    /// A number's exponent exceeded a magnitude of 511.
    ExponentOverflow,
    /// A number evaluated to an infinite or NaN result.
    NonFiniteNumber,
    /// `true`, `false`, or `null` was not spelled correctly.
    InvalidLiteral,
    /// An object or array was missing its `,` separator between entries.
    MissingSeparator,
    /// An object entry was missing its `:` between key and value.
    MissingColon,
    /// An object or array had a comma immediately before its closing bracket.
    TrailingComma,
    /// A bracket or brace did not match its opener, or a value appeared where a key was expected.
    Structural,
    /// Non-whitespace data followed the top-level value.
    TrailingGarbage,
    /// The top-level value was not an object or array.
    InvalidRoot,
    /// The byte source returned an I/O error.
    Io,
}

/// An error produced while parsing a document, carrying enough location information to point a
/// user at the offending byte, line, and column.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Identifies the input being parsed (a file path, or a placeholder for in-memory input).
    pub source: String,
    /// A short, human-readable description of the problem.
    pub message: String,
    /// The kind of error, for programmatic matching.
    pub kind: ParseErrorKind,
    /// 0-based line of the error.
    pub line: usize,
    /// 0-based column of the error.
    pub column: usize,
    /// 0-based line of the start of the token being parsed when the error was discovered.
    pub prev_line: usize,
    /// 0-based column of the start of the token being parsed when the error was discovered.
    pub prev_column: usize,
    /// Byte offset of the error from the start of input.
    pub offset: u64,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.source, self.line + 1, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// An error produced while serializing a document.
#[derive(Debug)]
pub enum SerializeError {
    /// The output sink accepted fewer bytes than were written to it in a single call.
    ShortWrite {
        /// Bytes the serializer attempted to write.
        expected: usize,
        /// Bytes the sink actually accepted.
        written: usize,
    },
    /// The output sink returned an I/O error.
    Io(std::io::Error),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::ShortWrite { expected, written } => {
                write!(f, "short write: expected to write {expected} bytes, wrote {written}")
            }
            SerializeError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SerializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializeError::Io(e) => Some(e),
            SerializeError::ShortWrite { .. } => None,
        }
    }
}

impl From<std::io::Error> for SerializeError {
    fn from(e: std::io::Error) -> SerializeError {
        SerializeError::Io(e)
    }
}
