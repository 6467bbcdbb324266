//! Read-until-delimiter buffering over a [`ByteSource`].

use std::io;

use crate::io::{ByteSource, DEFAULT_CHUNK_SIZE};

#[inline]
#[cfg(feature = "perf_memchr")]
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    memchr::memmem::find(haystack, needle)
}

#[inline]
#[cfg(not(feature = "perf_memchr"))]
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if let [b] = needle {
        return haystack.iter().position(|c| c == b);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Accumulates chunks from a source and hands them out one line at a time.
#[derive(Debug)]
pub struct LineBuffer<S> {
    source: S,
    buf: Vec<u8>,
    // bytes before `pos` have already been returned
    pos: usize,
    // bytes in `pos..scanned` are known not to start a delimiter match
    scanned: usize,
    eof: bool,
    chunk_size: usize,
}

impl<S: ByteSource> LineBuffer<S> {
    pub fn new(source: S) -> Self {
        Self::with_chunk_size(source, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(source: S, chunk_size: usize) -> Self {
        Self {
            source,
            buf: Vec::new(),
            pos: 0,
            scanned: 0,
            eof: false,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Next line including its trailing `delimiter`.
    ///
    /// The last line of the stream is returned without a delimiter if it
    /// lacks one. `Ok(None)` is returned once the stream is drained, after
    /// which the source is never read again.
    pub fn next_line(&mut self, delimiter: &[u8]) -> io::Result<Option<Vec<u8>>> {
        if delimiter.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty line delimiter",
            ));
        }
        loop {
            let from = self.scanned.max(self.pos);
            if let Some(rel) = find(&self.buf[from..], delimiter) {
                let end = from + rel + delimiter.len();
                return Ok(Some(self.take(end)));
            }
            if self.eof {
                if self.pos == self.buf.len() {
                    return Ok(None);
                }
                let end = self.buf.len();
                return Ok(Some(self.take(end)));
            }
            // a delimiter may straddle the old and new bytes
            self.scanned = self.buf.len().saturating_sub(delimiter.len() - 1).max(self.pos);
            self.fill()?;
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn take(&mut self, end: usize) -> Vec<u8> {
        let line = self.buf[self.pos..end].to_vec();
        self.pos = end;
        self.scanned = end;
        line
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.pos > 0 && self.pos * 2 >= self.buf.len() {
            self.buf.drain(..self.pos);
            self.scanned -= self.pos;
            self.pos = 0;
        }
        if self.source.read_chunk(&mut self.buf, self.chunk_size)? == 0 {
            self.eof = true;
        }
        Ok(())
    }
}
