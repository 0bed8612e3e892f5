//! # Byte Sink
//!
//! Position-tracked big-endian writer the encoders write into.
//!
//! Two implementations are provided:
//! - [`SliceSink`] - bounded writer over a caller-owned `&mut [u8]`
//! - [`bytes::BytesMut`] - growable writer, never exhausted
//!
//! Every primitive write is all-or-nothing: a value that does not fit is
//! rejected before any of its bytes are written. Bytes from earlier writes
//! stay in the sink.

use bytes::{BufMut, BytesMut};

use crate::error::{AvlError, Result};

/// Byte-order-aware output used by the record and packet encoders
///
/// All multi-byte writes are big-endian, as Codec 8 requires.
pub trait ByteSink {
    /// Current write position (bytes written so far)
    fn position(&self) -> usize;

    /// Total capacity, or `None` for a growable sink
    fn capacity(&self) -> Option<usize>;

    /// Bytes written so far
    fn written(&self) -> &[u8];

    /// Append raw bytes
    ///
    /// # Errors
    ///
    /// Returns [`AvlError::SinkExhausted`] if `data` does not fit
    fn put_slice(&mut self, data: &[u8]) -> Result<()>;

    /// Bytes left before the sink is exhausted
    fn remaining(&self) -> usize {
        match self.capacity() {
            Some(capacity) => capacity.saturating_sub(self.position()),
            None => usize::MAX,
        }
    }

    fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_slice(&[value])
    }

    fn put_u16(&mut self, value: u16) -> Result<()> {
        self.put_slice(&value.to_be_bytes())
    }

    fn put_u32(&mut self, value: u32) -> Result<()> {
        self.put_slice(&value.to_be_bytes())
    }

    fn put_u64(&mut self, value: u64) -> Result<()> {
        self.put_slice(&value.to_be_bytes())
    }

    fn put_i32(&mut self, value: i32) -> Result<()> {
        self.put_slice(&value.to_be_bytes())
    }
}

/// Bounded sink over a fixed-size, caller-owned byte region
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Wrap a byte region; writing starts at offset 0
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl ByteSink for SliceSink<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.buf.len())
    }

    fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    fn put_slice(&mut self, data: &[u8]) -> Result<()> {
        let remaining = self.buf.len() - self.pos;
        if data.len() > remaining {
            return Err(AvlError::SinkExhausted {
                needed: data.len(),
                remaining,
            });
        }

        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }
}

impl ByteSink for BytesMut {
    fn position(&self) -> usize {
        self.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn written(&self) -> &[u8] {
        &self[..]
    }

    fn put_slice(&mut self, data: &[u8]) -> Result<()> {
        BufMut::put_slice(self, data);
        Ok(())
    }
}
