use std::io;

use encoding_rs::{Decoder, Encoding};

use super::ByteSource;
use crate::error::ConfigError;

/// Decodes the wrapped source from a legacy encoding into UTF-8.
///
/// The decoder keeps state between chunks, so a multi-byte sequence split
/// across two reads still decodes. Malformed input becomes U+FFFD. Byte-order
/// marks are left alone; wrap the inner source in a
/// [`BomStrip`](super::BomStrip) to drop them.
pub struct Transcode<S> {
    inner: S,
    decoder: Decoder,
    raw: Vec<u8>,
    finished: bool,
}

impl<S: ByteSource> Transcode<S> {
    /// `label` is a WHATWG encoding label such as `"windows-1252"` or `"latin1"`.
    pub fn new(inner: S, label: &str) -> Result<Self, ConfigError> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))?;
        Ok(Self::with_encoding(inner, encoding))
    }

    pub fn with_encoding(inner: S, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder_without_bom_handling(),
            raw: Vec::new(),
            finished: false,
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.decoder.encoding()
    }
}

impl<S: ByteSource> ByteSource for Transcode<S> {
    /// `max` bounds the raw bytes pulled from the inner source; the decoded
    /// output may be longer.
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
        while !self.finished {
            self.raw.clear();
            let last = self.inner.read_chunk(&mut self.raw, max)? == 0;
            let needed = self
                .decoder
                .max_utf8_buffer_length(self.raw.len())
                .ok_or_else(|| io::Error::other("decoded chunk too large"))?;
            let start = buf.len();
            buf.resize(start + needed, 0);
            // Sized by max_utf8_buffer_length, so the whole chunk is consumed.
            let (_, _, written, _) = self.decoder.decode_to_utf8(&self.raw, &mut buf[start..], last);
            buf.truncate(start + written);
            self.finished = last;
            if written > 0 {
                return Ok(written);
            }
        }
        Ok(0)
    }
}
