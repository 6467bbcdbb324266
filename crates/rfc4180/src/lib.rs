#![doc = include_str!("../README.md")]

pub mod buffer;
pub mod error;
pub mod io;
pub mod options;
pub mod reader;
pub mod stream;

#[cfg(feature = "json")]
pub mod json;

pub use crate::buffer::LineBuffer;
pub use crate::error::{ConfigError, Error, FieldCountError, ParseError, ParseErrorKind, Result};
pub use crate::io::{Bom, BomStrip, ByteSource, IoSource};
#[cfg(feature = "encoding")]
pub use crate::io::Transcode;
pub use crate::options::Options;
pub use crate::reader::{ReadOutcome, Reader, Record, Records};
pub use crate::stream::{HeaderStream, RecordStream, Row};

use std::io::Read;

/// Reader over any [`Read`], with a leading byte-order mark removed.
pub fn from_reader<R: Read>(reader: R, options: &Options) -> Result<Reader<BomStrip<IoSource<R>>>> {
    Reader::new(BomStrip::new(IoSource::new(reader)), options.clone())
}

/// Reader over an in-memory buffer, with a leading byte-order mark removed.
pub fn from_slice<'a>(bytes: &'a [u8], options: &Options) -> Result<Reader<BomStrip<&'a [u8]>>> {
    Reader::new(BomStrip::new(bytes), options.clone())
}

/// Every record in `s`. Fails on the first error of any kind.
pub fn read_all(s: &str, options: &Options) -> Result<Vec<Record>> {
    from_slice(s.as_bytes(), options)?.records().collect()
}
