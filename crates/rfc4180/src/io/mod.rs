//! Byte sources consumed by the line buffer, and the decorators that rewrite
//! bytes before they reach it.

mod bom;
#[cfg(feature = "encoding")]
mod transcode;

pub use bom::{Bom, BomStrip};
#[cfg(feature = "encoding")]
pub use transcode::Transcode;

use std::io::{self, Read};

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Pull-based supplier of bytes.
pub trait ByteSource {
    /// Appends at most `max` bytes to `buf` and returns how many were added.
    /// `Ok(0)` means the stream has ended.
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
        (**self).read_chunk(buf, max)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
        (**self).read_chunk(buf, max)
    }
}

impl ByteSource for &[u8] {
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
        let n = max.min(self.len());
        let (head, tail) = self.split_at(n);
        buf.extend_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// Adapts any [`Read`] into a [`ByteSource`].
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
        let start = buf.len();
        buf.resize(start + max, 0);
        let res = loop {
            match self.inner.read(&mut buf[start..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        let n = *res.as_ref().unwrap_or(&0);
        buf.truncate(start + n);
        res
    }
}
