//! Skip-and-continue iteration over a [`Reader`].

use core::iter::FusedIterator;

use tracing::warn;

use crate::error::{Error, FieldCountError, Result};
use crate::io::ByteSource;
use crate::reader::{ReadOutcome, Reader, Record};

/// A record keyed by header names, in header order.
pub type Row = Vec<(String, String)>;

/// Yields well-formed records, setting aside the ones with the wrong number
/// of fields.
///
/// In [`strict`](crate::Options::strict) mode a field count mismatch is
/// yielded as an error instead. Any other error is yielded once and ends the
/// stream.
pub struct RecordStream<S> {
    reader: Reader<S>,
    errors: Vec<FieldCountError>,
    done: bool,
}

impl<S: ByteSource> RecordStream<S> {
    pub fn new(reader: Reader<S>) -> Self {
        Self {
            reader,
            errors: Vec::new(),
            done: false,
        }
    }

    /// Treat the first record as header names.
    pub fn with_headers(self) -> HeaderStream<S> {
        HeaderStream {
            inner: self,
            headers: None,
        }
    }

    /// Key every record by `headers`; no record is consumed as a header.
    ///
    /// Unless the reader already expects a field count, records must have
    /// one field per header.
    pub fn with_given_headers(mut self, headers: Vec<String>) -> HeaderStream<S> {
        self.reader.expect_fields(headers.len());
        HeaderStream {
            inner: self,
            headers: Some(headers),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Records skipped so far, in stream order.
    pub fn errors(&self) -> &[FieldCountError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldCountError> {
        self.errors
    }

    pub fn reader(&self) -> &Reader<S> {
        &self.reader
    }

    fn skip_or_raise(&mut self, e: FieldCountError) -> Option<Error> {
        if self.reader.options().strict {
            return Some(e.into());
        }
        warn!(
            record = e.record_number,
            line = e.start_line,
            expected = e.expected,
            found = e.record.len(),
            "skipping record with wrong number of fields"
        );
        self.errors.push(e);
        None
    }
}

impl<S: ByteSource> Iterator for RecordStream<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.reader.next_outcome() {
                ReadOutcome::Record(record) => return Some(Ok(record)),
                ReadOutcome::FieldCount(e) => {
                    if let Some(err) = self.skip_or_raise(e) {
                        return Some(Err(err));
                    }
                }
                ReadOutcome::Fatal(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
                ReadOutcome::End => self.done = true,
            }
        }
        None
    }
}

impl<S: ByteSource> FusedIterator for RecordStream<S> {}

/// Yields records as [`Row`]s keyed by header names.
pub struct HeaderStream<S> {
    inner: RecordStream<S>,
    headers: Option<Vec<String>>,
}

impl<S: ByteSource> HeaderStream<S> {
    /// Header names, once known.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    pub fn has_errors(&self) -> bool {
        self.inner.has_errors()
    }

    pub fn reader(&self) -> &Reader<S> {
        self.inner.reader()
    }

    pub fn errors(&self) -> &[FieldCountError] {
        self.inner.errors()
    }

    pub fn into_errors(self) -> Vec<FieldCountError> {
        self.inner.into_errors()
    }
}

impl<S: ByteSource> Iterator for HeaderStream<S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.inner.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            let Some(headers) = &self.headers else {
                self.headers = Some(record);
                continue;
            };
            if record.len() != headers.len() {
                // Given headers that disagree with a preset field count.
                let reader = &self.inner.reader;
                let e = FieldCountError {
                    start_line: reader.record_start_line(),
                    line: reader.line(),
                    record_number: reader.record_number(),
                    expected: headers.len(),
                    record,
                };
                match self.inner.skip_or_raise(e) {
                    Some(err) => return Some(Err(err)),
                    None => continue,
                }
            }
            return Some(Ok(headers.iter().cloned().zip(record).collect()));
        }
    }
}

impl<S: ByteSource> FusedIterator for HeaderStream<S> {}
