use std::fmt;
use std::io;

use thiserror::Error;

use crate::reader::Record;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    FieldCount(#[from] FieldCountError),

    #[error("invalid UTF-8 on line {line}")]
    InvalidUtf8 { line: usize },
}

impl Error {
    /// Only a field count mismatch leaves the reader positioned at the next record.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::FieldCount(_))
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// Rejected delimiter/quote/comment combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("comma and comment are both {0:?}")]
    CommaIsComment(char),

    #[error("comma and quote are both {0:?}")]
    CommaIsQuote(char),

    #[error("quote and comment are both {0:?}")]
    QuoteIsComment(char),

    #[error("invalid field delimiter {0:?}")]
    InvalidComma(char),

    #[error("invalid quote character {0:?}")]
    InvalidQuote(char),

    #[error("invalid comment character {0:?}")]
    InvalidComment(char),

    #[error("unknown encoding label {0:?}")]
    UnknownEncoding(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    BareQuote,
    ExtraneousQuote,
    UnexpectedEof,
}

impl ParseErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ParseErrorKind::BareQuote => "bare quote in non-quoted field",
            ParseErrorKind::ExtraneousQuote => "extraneous or missing quote in quoted-field",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Malformed quoting. The record that raised it is lost.
///
/// `column` counts Unicode scalar values before the fault on physical line
/// `line`, which differs from `start_line` when a quoted field spans lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub start_line: usize,
    pub line: usize,
    pub column: Option<usize>,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            None => write!(f, "record on line {}: {}", self.line, self.kind),
            Some(col) if self.start_line != self.line => write!(
                f,
                "record on line {}; parse error on line {}, column {}: {}",
                self.start_line, self.line, col, self.kind
            ),
            Some(col) => write!(
                f,
                "parse error on line {}, column {}: {}",
                self.line, col, self.kind
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// A well-formed record with the wrong number of fields.
///
/// The reader is already positioned after the record, so the caller may keep
/// reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "record {record_number} on line {line}: wrong number of fields (expected {expected}, found {})",
    .record.len()
)]
pub struct FieldCountError {
    pub start_line: usize,
    pub line: usize,
    pub record_number: usize,
    pub expected: usize,
    pub record: Record,
}
