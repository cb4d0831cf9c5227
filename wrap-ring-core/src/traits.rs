//! Ring buffer traits.
//!
//! Two capabilities are exposed. [`ByteWriter`]/[`ByteReader`] move raw bytes
//! and are what a ring shares with linear readers and writers on either side
//! of it. [`RecordProducer`]/[`RecordConsumer`] move whole records and are
//! implemented by the element and framed rings.

use byteorder::ByteOrder;

use crate::error::{InsufficientDataSnafu, Result};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Backing memory for a ring.
///
/// Borrowed (`&mut [u8]`), owned (`Box<[u8]>`, `Vec<u8>`) and inline
/// (`[u8; N]`) storage all qualify.
pub trait Storage: AsRef<[u8]> + AsMut<[u8]> {}

impl<B: AsRef<[u8]> + AsMut<[u8]> + ?Sized> Storage for B {}

/// Occupancy queries shared by every ring.
pub trait RingInfo {
    /// Capacity in the ring's own unit (bytes or slots).
    fn capacity(&self) -> usize;

    /// Stored units (bytes, elements or entries).
    fn len(&self) -> usize;

    /// Unused capacity in the ring's own unit.
    fn free_space(&self) -> usize;

    /// True if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the next write must evict.
    fn is_full(&self) -> bool {
        self.free_space() == 0
    }
}

/// Sink for raw bytes.
pub trait ByteWriter {
    /// Write all of `data`.
    fn write_bytes(&mut self, data: &[u8]) -> Result<()>;

    /// Write one byte.
    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Write a `u16` in byte order `E`.
    #[inline]
    fn write_u16<E: ByteOrder>(&mut self, value: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        E::write_u16(&mut buf, value);
        self.write_bytes(&buf)
    }

    /// Write a `u32` in byte order `E`.
    #[inline]
    fn write_u32<E: ByteOrder>(&mut self, value: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        E::write_u32(&mut buf, value);
        self.write_bytes(&buf)
    }

    /// Write a `u64` in byte order `E`.
    #[inline]
    fn write_u64<E: ByteOrder>(&mut self, value: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        E::write_u64(&mut buf, value);
        self.write_bytes(&buf)
    }
}

/// Source of raw bytes with non-destructive lookahead.
pub trait ByteReader {
    /// Bytes available to read.
    fn available(&self) -> usize;

    /// Copy `dest.len()` bytes starting `offset` bytes past the read position.
    /// Never changes what is stored.
    fn peek_bytes(&self, dest: &mut [u8], offset: usize) -> Result<()>;

    /// Discard the next `n` bytes.
    fn consume(&mut self, n: usize) -> Result<()>;

    /// Copy the next `dest.len()` bytes out and discard them.
    #[inline]
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.peek_bytes(dest, 0)?;
        self.consume(dest.len())
    }

    /// Peek one byte at `offset`.
    #[inline]
    fn peek_u8(&self, offset: usize) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.peek_bytes(&mut buf, offset)?;
        Ok(buf[0])
    }

    /// Peek a `u16` in byte order `E` at `offset`.
    #[inline]
    fn peek_u16<E: ByteOrder>(&self, offset: usize) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.peek_bytes(&mut buf, offset)?;
        Ok(E::read_u16(&buf))
    }

    /// Peek a `u32` in byte order `E` at `offset`.
    #[inline]
    fn peek_u32<E: ByteOrder>(&self, offset: usize) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.peek_bytes(&mut buf, offset)?;
        Ok(E::read_u32(&buf))
    }

    /// Peek a `u64` in byte order `E` at `offset`.
    #[inline]
    fn peek_u64<E: ByteOrder>(&self, offset: usize) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.peek_bytes(&mut buf, offset)?;
        Ok(E::read_u64(&buf))
    }

    /// Read one byte.
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek_u8(0)?;
        self.consume(1)?;
        Ok(value)
    }

    /// Read a `u16` in byte order `E`.
    #[inline]
    fn read_u16<E: ByteOrder>(&mut self) -> Result<u16> {
        let value = self.peek_u16::<E>(0)?;
        self.consume(2)?;
        Ok(value)
    }

    /// Read a `u32` in byte order `E`.
    #[inline]
    fn read_u32<E: ByteOrder>(&mut self) -> Result<u32> {
        let value = self.peek_u32::<E>(0)?;
        self.consume(4)?;
        Ok(value)
    }

    /// Read a `u64` in byte order `E`.
    #[inline]
    fn read_u64<E: ByteOrder>(&mut self) -> Result<u64> {
        let value = self.peek_u64::<E>(0)?;
        self.consume(8)?;
        Ok(value)
    }
}

/// Linear reader: consuming advances the slice.
impl ByteReader for &[u8] {
    #[inline]
    fn available(&self) -> usize {
        self.len()
    }

    fn peek_bytes(&self, dest: &mut [u8], offset: usize) -> Result<()> {
        let end = offset.saturating_add(dest.len());
        snafu::ensure!(
            end <= self.len(),
            InsufficientDataSnafu {
                requested: end,
                available: self.len(),
            }
        );
        dest.copy_from_slice(&self[offset..end]);
        Ok(())
    }

    fn consume(&mut self, n: usize) -> Result<()> {
        snafu::ensure!(
            n <= self.len(),
            InsufficientDataSnafu {
                requested: n,
                available: self.len(),
            }
        );
        *self = &self[n..];
        Ok(())
    }
}

/// Linear writer: appends, never evicts.
#[cfg(feature = "alloc")]
impl ByteWriter for Vec<u8> {
    #[inline]
    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

/// Accepts whole records, evicting the oldest ones when full.
pub trait RecordProducer: RingInfo {
    /// Store `record` as one unit.
    fn push_record(&mut self, record: &[u8]) -> Result<()>;
}

/// Hands out whole records in FIFO order.
pub trait RecordConsumer: RingInfo {
    /// Length of the oldest record, `None` if empty.
    fn front_len(&self) -> Option<usize>;

    /// Copy the oldest record into `dest` without removing it.
    /// Returns the record length.
    fn copy_front(&self, dest: &mut [u8]) -> Result<usize>;

    /// Remove the oldest record. Returns the bytes released.
    fn remove_front(&mut self) -> Result<usize>;

    /// Copy the oldest record into `dest`, then remove it.
    /// Returns the record length.
    #[inline]
    fn pop_into(&mut self, dest: &mut [u8]) -> Result<usize> {
        let len = self.copy_front(dest)?;
        self.remove_front()?;
        Ok(len)
    }
}

/// Combined producer and consumer.
pub trait RecordRing: RecordProducer + RecordConsumer {}

impl<R: RecordProducer + RecordConsumer> RecordRing for R {}
