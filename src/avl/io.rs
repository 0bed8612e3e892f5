//! # I/O Elements
//!
//! Fixed-capacity buckets of I/O readings, grouped by value width.
//!
//! A record carries up to 16 one-byte, 8 two-byte, 4 four-byte and 2
//! eight-byte readings. Insertion order is kept and is the wire order.
//! Ids are not deduplicated.

use heapless::Vec;

use super::protocol::{N1_CAPACITY, N2_CAPACITY, N4_CAPACITY, N8_CAPACITY};
use super::sink::ByteSink;
use crate::error::{AvlError, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Unsigned value type an I/O bucket can hold
pub trait IoValue: sealed::Sealed + Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write the value big-endian
    fn write_to(self, sink: &mut dyn ByteSink) -> Result<()>;
}

impl IoValue for u8 {
    const WIDTH: usize = 1;

    fn write_to(self, sink: &mut dyn ByteSink) -> Result<()> {
        sink.put_u8(self)
    }
}

impl IoValue for u16 {
    const WIDTH: usize = 2;

    fn write_to(self, sink: &mut dyn ByteSink) -> Result<()> {
        sink.put_u16(self)
    }
}

impl IoValue for u32 {
    const WIDTH: usize = 4;

    fn write_to(self, sink: &mut dyn ByteSink) -> Result<()> {
        sink.put_u32(self)
    }
}

impl IoValue for u64 {
    const WIDTH: usize = 8;

    fn write_to(self, sink: &mut dyn ByteSink) -> Result<()> {
        sink.put_u64(self)
    }
}

/// Ordered, bounded collection of `(id, value)` readings of one width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoBucket<T: IoValue, const N: usize> {
    entries: Vec<(u8, T), N>,
}

impl<T: IoValue, const N: usize> Default for IoBucket<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IoValue, const N: usize> IoBucket<T, N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a reading
    ///
    /// # Errors
    ///
    /// Returns [`AvlError::IoCapacityExceeded`] if the bucket is full.
    /// The bucket is left unchanged.
    pub fn push(&mut self, id: u8, value: T) -> Result<()> {
        self.entries
            .push((id, value))
            .map_err(|_| AvlError::IoCapacityExceeded {
                width: T::WIDTH,
                capacity: N,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Readings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(u8, T)> {
        self.entries.iter()
    }

    /// Encoded size: count byte plus `id + value` per reading
    pub fn encoded_len(&self) -> usize {
        1 + self.len() * (1 + T::WIDTH)
    }

    /// Write the count byte followed by each `id, value` pair
    pub(crate) fn encode(&self, sink: &mut dyn ByteSink) -> Result<()> {
        // len() <= N <= 16, so the cast cannot truncate
        sink.put_u8(self.len() as u8)?;
        for &(id, value) in self.iter() {
            sink.put_u8(id)?;
            value.write_to(sink)?;
        }
        Ok(())
    }
}

pub type N1Bucket = IoBucket<u8, N1_CAPACITY>;
pub type N2Bucket = IoBucket<u16, N2_CAPACITY>;
pub type N4Bucket = IoBucket<u32, N4_CAPACITY>;
pub type N8Bucket = IoBucket<u64, N8_CAPACITY>;

/// I/O section of an AVL record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoElements {
    /// Id of the reading that triggered the record, 0 if none
    pub event_io_id: u8,

    pub n1: N1Bucket,
    pub n2: N2Bucket,
    pub n4: N4Bucket,
    pub n8: N8Bucket,
}

impl IoElements {
    /// Add a one-byte reading
    pub fn add_n1(&mut self, id: u8, value: u8) -> Result<()> {
        self.n1.push(id, value)
    }

    /// Add a two-byte reading
    pub fn add_n2(&mut self, id: u8, value: u16) -> Result<()> {
        self.n2.push(id, value)
    }

    /// Add a four-byte reading
    pub fn add_n4(&mut self, id: u8, value: u32) -> Result<()> {
        self.n4.push(id, value)
    }

    /// Add an eight-byte reading
    pub fn add_n8(&mut self, id: u8, value: u64) -> Result<()> {
        self.n8.push(id, value)
    }

    /// Number of readings across all buckets (at most 30)
    pub fn total(&self) -> usize {
        self.n1.len() + self.n2.len() + self.n4.len() + self.n8.len()
    }

    /// Encoded size of the four buckets (count bytes included)
    pub fn buckets_encoded_len(&self) -> usize {
        self.n1.encoded_len()
            + self.n2.encoded_len()
            + self.n4.encoded_len()
            + self.n8.encoded_len()
    }

    /// Write the buckets in width order 1, 2, 4, 8
    pub(crate) fn encode_buckets(&self, sink: &mut dyn ByteSink) -> Result<()> {
        self.n1.encode(sink)?;
        self.n2.encode(sink)?;
        self.n4.encode(sink)?;
        self.n8.encode(sink)
    }
}
