use std::io;

use tracing::debug;

use super::ByteSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

// UTF-32LE shares its first two bytes with UTF-16LE, so it must be tried first.
const BOMS: [Bom; 5] = [Bom::Utf8, Bom::Utf32Be, Bom::Utf32Le, Bom::Utf16Be, Bom::Utf16Le];

const LONGEST_BOM: usize = 4;

impl Bom {
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Bom::Utf8 => b"\xEF\xBB\xBF",
            Bom::Utf16Be => b"\xFE\xFF",
            Bom::Utf16Le => b"\xFF\xFE",
            Bom::Utf32Be => b"\x00\x00\xFE\xFF",
            Bom::Utf32Le => b"\xFF\xFE\x00\x00",
        }
    }

    /// Longest byte-order mark that `bytes` starts with.
    pub fn detect(bytes: &[u8]) -> Option<Bom> {
        BOMS.into_iter().find(|b| bytes.starts_with(b.bytes()))
    }
}

fn may_be_bom_prefix(bytes: &[u8]) -> bool {
    BOMS.iter().any(|b| {
        let m = b.bytes();
        m.len() > bytes.len() && m.starts_with(bytes)
    })
}

/// Removes a byte-order mark from the very start of the wrapped source.
///
/// Only the first bytes of the stream are inspected; everything after them
/// passes through untouched.
#[derive(Debug)]
pub struct BomStrip<S> {
    inner: S,
    probed: bool,
    // bytes read while probing, not yet handed out
    head: Vec<u8>,
    head_pos: usize,
    bom: Option<Bom>,
}

impl<S: ByteSource> BomStrip<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            probed: false,
            head: Vec::new(),
            head_pos: 0,
            bom: None,
        }
    }

    /// The mark that was stripped, once the first chunk has been read.
    pub fn bom(&self) -> Option<Bom> {
        self.bom
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn probe(&mut self, max: usize) -> io::Result<()> {
        self.probed = true;
        // Small reads may deliver a mark piecewise.
        while self.head.len() < LONGEST_BOM && may_be_bom_prefix(&self.head) {
            if self.inner.read_chunk(&mut self.head, max.max(1))? == 0 {
                break;
            }
        }
        if let Some(bom) = Bom::detect(&self.head) {
            self.head.drain(..bom.bytes().len());
            self.bom = Some(bom);
            debug!(?bom, "stripped byte-order mark");
        }
        Ok(())
    }
}

impl<S: ByteSource> ByteSource for BomStrip<S> {
    fn read_chunk(&mut self, buf: &mut Vec<u8>, max: usize) -> io::Result<usize> {
        if !self.probed {
            self.probe(max)?;
        }
        let pending = self.head.len() - self.head_pos;
        if pending == 0 {
            return self.inner.read_chunk(buf, max);
        }
        let n = pending.min(max);
        buf.extend_from_slice(&self.head[self.head_pos..self.head_pos + n]);
        self.head_pos += n;
        if self.head_pos == self.head.len() {
            self.head = Vec::new();
            self.head_pos = 0;
        }
        Ok(n)
    }
}
