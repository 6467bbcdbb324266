//! RFC4180 record reader.
//!
//! A valid stream holds zero or more records of one or more fields, each
//! record terminated by `\n`. The final record may omit it.
//!
//! - Whitespace is part of a field unless `trim_leading_space` is set, in
//!   which case ASCII spaces before a field are dropped.
//! - A `\r` right before `\n` is removed. A lone `\r` is field content.
//! - Blank lines are skipped. A line holding only spaces is not blank.
//! - A field that starts with the quote character is a quoted field. The
//!   surrounding quotes are not part of the value, a doubled quote stands
//!   for one literal quote, and commas and newlines may appear inside.

use core::iter::FusedIterator;

use tracing::{debug, trace};

use crate::buffer::LineBuffer;
use crate::error::{Error, FieldCountError, ParseError, ParseErrorKind, Result};
use crate::io::ByteSource;
use crate::options::Options;

pub type Record = Vec<String>;

#[cfg(feature = "perf_smallvec")]
type FieldEnds = smallvec::SmallVec<[usize; 16]>;
#[cfg(not(feature = "perf_smallvec"))]
type FieldEnds = Vec<usize>;

/// Result of one read, with the recoverable case split out.
#[derive(Debug)]
pub enum ReadOutcome {
    Record(Record),
    /// The record was read in full but had the wrong shape; reading may go on.
    FieldCount(FieldCountError),
    /// The reader should not be used after this.
    Fatal(Error),
    End,
}

pub struct Reader<S> {
    lines: LineBuffer<S>,
    options: Options,
    expected_fields: usize,
    line_num: usize,
    record_num: usize,
    record_start_line: usize,
    record_buffer: String,
    field_ends: FieldEnds,
}

impl<S: ByteSource> Reader<S> {
    pub fn new(source: S, options: Options) -> Result<Self> {
        Self::with_line_buffer(LineBuffer::new(source), options)
    }

    pub fn with_line_buffer(lines: LineBuffer<S>, options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            lines,
            expected_fields: options.expected_fields,
            options,
            line_num: 0,
            record_num: 0,
            record_start_line: 0,
            record_buffer: String::new(),
            field_ends: FieldEnds::new(),
        })
    }

    /// Swap the configuration between reads. An invalid configuration is
    /// rejected and the current one stays in effect.
    ///
    /// A zero `expected_fields` keeps whatever count was already inferred.
    pub fn reconfigure(&mut self, options: Options) -> Result<()> {
        options.validate()?;
        if options.expected_fields != 0 {
            self.expected_fields = options.expected_fields;
        }
        debug!(?options, line = self.line_num, "reader reconfigured");
        self.options = options;
        Ok(())
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Physical lines consumed so far, blank and comment lines included.
    pub fn line(&self) -> usize {
        self.line_num
    }

    /// Records started so far, including ones that failed.
    pub fn record_number(&self) -> usize {
        self.record_num
    }

    /// Line on which the most recently started record began.
    pub fn record_start_line(&self) -> usize {
        self.record_start_line
    }

    /// Field count every record must have; 0 until the first record sets it.
    pub fn expected_fields(&self) -> usize {
        self.expected_fields
    }

    /// Fixes the field count before the first record is read. A count that
    /// is already known is left alone.
    pub(crate) fn expect_fields(&mut self, n: usize) {
        if self.expected_fields == 0 {
            self.expected_fields = n;
        }
    }

    pub fn into_inner(self) -> S {
        self.lines.into_inner()
    }

    /// Lazily yields records. Field count mismatches come out as `Err` items
    /// and iteration continues; any other error ends it.
    pub fn records(&mut self) -> Records<'_, S> {
        Records {
            reader: self,
            done: false,
        }
    }

    pub fn next_outcome(&mut self) -> ReadOutcome {
        match self.read_record() {
            Ok(Some(record)) => ReadOutcome::Record(record),
            Ok(None) => ReadOutcome::End,
            Err(Error::FieldCount(e)) => ReadOutcome::FieldCount(e),
            Err(e) => ReadOutcome::Fatal(e),
        }
    }

    /// Reads the next record, or `Ok(None)` at end of stream.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let Some(line) = self.next_data_line()? else {
            return Ok(None);
        };
        self.record_num += 1;
        let start_line = self.line_num;
        self.record_start_line = start_line;
        self.parse_fields(line, start_line)?;

        let mut record = Vec::with_capacity(self.field_ends.len());
        let mut prev = 0usize;
        for &end in self.field_ends.iter() {
            record.push(self.record_buffer[prev..end].to_string());
            prev = end;
        }

        if self.expected_fields == 0 {
            self.expected_fields = record.len();
            debug!(fields = record.len(), line = start_line, "inferred field count");
        } else if record.len() != self.expected_fields {
            return Err(FieldCountError {
                start_line,
                line: self.line_num,
                record_number: self.record_num,
                expected: self.expected_fields,
                record,
            }
            .into());
        }
        Ok(Some(record))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let Some(mut bytes) = self.lines.next_line(b"\n")? else {
            return Ok(None);
        };
        self.line_num += 1;
        if bytes.ends_with(b"\r\n") {
            let n = bytes.len();
            bytes.truncate(n - 2);
            bytes.push(b'\n');
        }
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| Error::InvalidUtf8 {
                line: self.line_num,
            })
    }

    fn next_data_line(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.read_line()? {
            if self.options.comment.is_some_and(|c| line.starts_with(c)) {
                trace!(line = self.line_num, "skipping comment line");
                continue;
            }
            if line.is_empty() || line == "\n" {
                trace!(line = self.line_num, "skipping blank line");
                continue;
            }
            return Ok(Some(line));
        }
        Ok(None)
    }

    /// Tokenizes one record into `record_buffer`/`field_ends`, pulling more
    /// physical lines while inside a quoted field.
    fn parse_fields(&mut self, mut line: String, start_line: usize) -> Result<()> {
        let Options {
            comma,
            quote,
            trim_leading_space,
            lazy_quotes,
            ..
        } = self.options;
        self.record_buffer.clear();
        self.field_ends.clear();

        let mut pos = 0usize;
        'fields: loop {
            if trim_leading_space {
                pos += leading_spaces(&line[pos..]);
            }
            let rest = &line[pos..];

            if !rest.starts_with(quote) {
                let (field, next) = match rest.find(comma) {
                    Some(i) => (&rest[..i], Some(pos + i + comma.len_utf8())),
                    None => (strip_terminator(rest), None),
                };
                if !lazy_quotes {
                    if let Some(j) = field.find(quote) {
                        let column = column_at(&line, pos + j);
                        return Err(self.parse_error(start_line, column, ParseErrorKind::BareQuote));
                    }
                }
                self.record_buffer.push_str(field);
                self.field_ends.push(self.record_buffer.len());
                match next {
                    Some(n) => {
                        pos = n;
                        continue 'fields;
                    }
                    None => break 'fields,
                }
            }

            pos += quote.len_utf8();
            loop {
                let rest = &line[pos..];
                if let Some(i) = rest.find(quote) {
                    self.record_buffer.push_str(&rest[..i]);
                    let quote_pos = pos + i;
                    pos = quote_pos + quote.len_utf8();
                    let after = &line[pos..];
                    if after.starts_with(quote) {
                        // "" is an escaped quote
                        self.record_buffer.push(quote);
                        pos += quote.len_utf8();
                    } else if after.starts_with(comma) {
                        pos += comma.len_utf8();
                        self.field_ends.push(self.record_buffer.len());
                        continue 'fields;
                    } else if after.is_empty() || after == "\n" {
                        self.field_ends.push(self.record_buffer.len());
                        break 'fields;
                    } else if lazy_quotes {
                        self.record_buffer.push(quote);
                    } else {
                        let column = column_at(&line, quote_pos);
                        return Err(self.parse_error(
                            start_line,
                            column,
                            ParseErrorKind::ExtraneousQuote,
                        ));
                    }
                } else if !rest.is_empty() {
                    // Newline inside the quoted field; it continues on the next line.
                    self.record_buffer.push_str(rest);
                    match self.read_line()? {
                        Some(next) => {
                            line = next;
                            pos = 0;
                        }
                        None => {
                            let column = strip_terminator(&line).chars().count();
                            return Err(self.parse_error(
                                start_line,
                                column,
                                ParseErrorKind::UnexpectedEof,
                            ));
                        }
                    }
                } else {
                    // Stream ended right after content inside the quotes.
                    if !lazy_quotes {
                        let column = strip_terminator(&line).chars().count();
                        return Err(self.parse_error(
                            start_line,
                            column,
                            ParseErrorKind::ExtraneousQuote,
                        ));
                    }
                    self.field_ends.push(self.record_buffer.len());
                    break 'fields;
                }
            }
        }
        Ok(())
    }

    fn parse_error(&self, start_line: usize, column: usize, kind: ParseErrorKind) -> Error {
        Error::Parse(ParseError {
            start_line,
            line: self.line_num,
            column: Some(column),
            kind,
        })
    }
}

/// Iterator returned by [`Reader::records`].
pub struct Records<'r, S> {
    reader: &'r mut Reader<S>,
    done: bool,
}

impl<S: ByteSource> Iterator for Records<'_, S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = !e.is_recoverable();
                Some(Err(e))
            }
        }
    }
}

impl<S: ByteSource> FusedIterator for Records<'_, S> {}

#[inline]
fn leading_spaces(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b' ').count()
}

#[inline]
fn strip_terminator(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}

/// Unicode scalar values before byte offset `at`.
#[inline]
fn column_at(line: &str, at: usize) -> usize {
    line[..at].chars().count()
}
