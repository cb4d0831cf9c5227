//! Byte-granular ring buffer with overwrite-on-full.

use core::fmt;

use snafu::ensure;
use tracing::{debug, trace};

use crate::error::{ExceedsCapacitySnafu, InsufficientDataSnafu, Result, ZeroCapacitySnafu};
use crate::index::{Index, segments};
use crate::spill::{DropSpill, Spill};
use crate::traits::{ByteReader, ByteWriter, RingInfo, Storage};

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec};

/// Ring of raw bytes over fixed storage.
///
/// Writes that do not fit in the free space evict exactly as many of the
/// oldest bytes as needed, handing them to the [`Spill`] sink first. A single
/// write larger than the capacity is rejected.
///
/// ```
/// use wrap_ring_core::ByteRing;
///
/// let mut storage = [0u8; 3];
/// let mut ring = ByteRing::new(&mut storage[..]).unwrap();
/// ring.write(&[0x46, 0xa5]).unwrap();
/// ring.write(&[0xfd, 0xcc]).unwrap(); // evicts 0x46
///
/// let mut out = [0u8; 3];
/// ring.read(&mut out).unwrap();
/// assert_eq!(out, [0xa5, 0xfd, 0xcc]);
/// ```
pub struct ByteRing<B, S = DropSpill> {
    storage: B,
    capacity: usize,
    read: Index,
    write: Index,
    free: usize,
    spill: S,
}

impl<B: Storage> ByteRing<B, DropSpill> {
    /// Create a ring over `storage`; evicted bytes are discarded.
    pub fn new(storage: B) -> Result<Self> {
        Self::with_spill(storage, DropSpill)
    }
}

#[cfg(feature = "alloc")]
impl ByteRing<Box<[u8]>, DropSpill> {
    /// Create a ring over freshly allocated, owned storage.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(vec![0u8; capacity].into_boxed_slice())
    }
}

impl<B: Storage, S: Spill> ByteRing<B, S> {
    /// Create a ring over `storage` that spills evicted bytes to `spill`.
    pub fn with_spill(storage: B, spill: S) -> Result<Self> {
        let capacity = storage.as_ref().len();
        ensure!(capacity > 0, ZeroCapacitySnafu);
        debug!(capacity, "created byte ring");

        Ok(Self {
            storage,
            capacity,
            read: Index::zero(),
            write: Index::zero(),
            free: capacity,
            spill,
        })
    }

    /// Total capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently stored.
    #[inline]
    #[must_use]
    pub fn used_space(&self) -> usize {
        self.capacity - self.free
    }

    /// Bytes that can be written without eviction.
    #[inline]
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.free
    }

    /// True if no bytes are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.free == self.capacity
    }

    /// True if every byte is in use.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free == 0
    }

    /// Append `data`, evicting the oldest bytes if there is not enough room.
    ///
    /// Fails only when `data` is longer than the whole ring.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let len = data.len();
        ensure!(
            len <= self.capacity,
            ExceedsCapacitySnafu {
                len,
                capacity: self.capacity,
            }
        );

        if self.free < len {
            let evict = len - self.free;
            trace!(evict, capacity = self.capacity, "byte ring full, evicting oldest bytes");
            self.evict(evict);
        }

        let (head, tail) = segments(self.write, len, self.capacity);
        let split = head.len();
        let buf = self.storage.as_mut();
        buf[head].copy_from_slice(&data[..split]);
        buf[tail].copy_from_slice(&data[split..]);

        self.write.advance(len, self.capacity);
        self.free -= len;
        Ok(())
    }

    /// Discard the oldest `n` bytes. Nothing is spilled.
    pub fn erase(&mut self, n: usize) -> Result<()> {
        ensure!(
            n <= self.used_space(),
            InsufficientDataSnafu {
                requested: n,
                available: self.used_space(),
            }
        );
        self.discard(n);
        Ok(())
    }

    /// Copy `dest.len()` bytes starting `offset` bytes past the oldest byte.
    /// The ring is left untouched.
    pub fn peek(&self, dest: &mut [u8], offset: usize) -> Result<()> {
        let (head, tail) = self.segments(offset, dest.len())?;
        let split = head.len();
        dest[..split].copy_from_slice(head);
        dest[split..].copy_from_slice(tail);
        Ok(())
    }

    /// Copy the oldest `dest.len()` bytes out and erase them.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<()> {
        self.peek(dest, 0)?;
        self.discard(dest.len());
        Ok(())
    }

    /// The `len` bytes starting `offset` past the oldest byte, as the
    /// contiguous part and the wrapped remainder.
    pub fn segments(&self, offset: usize, len: usize) -> Result<(&[u8], &[u8])> {
        let requested = offset.saturating_add(len);
        ensure!(
            requested <= self.used_space(),
            InsufficientDataSnafu {
                requested,
                available: self.used_space(),
            }
        );

        let start = self.read.offset(offset, self.capacity);
        let (head, tail) = segments(start, len, self.capacity);
        let buf = self.storage.as_ref();
        Ok((&buf[head], &buf[tail]))
    }

    /// All stored bytes, oldest first, as two slices.
    #[must_use]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let (head, tail) = segments(self.read, self.used_space(), self.capacity);
        let buf = self.storage.as_ref();
        (&buf[head], &buf[tail])
    }

    /// Forget all stored bytes. The backing memory is not zeroed.
    pub fn clear(&mut self) {
        trace!(discarded = self.used_space(), "clearing byte ring");
        self.read = Index::zero();
        self.write = Index::zero();
        self.free = self.capacity;
    }

    /// Spill every stored byte as one unit and empty the ring.
    /// Returns the number of bytes flushed.
    pub fn flush(&mut self) -> usize {
        let used = self.used_space();
        if used > 0 {
            trace!(used, "flushing byte ring to spill");
            self.evict(used);
        }
        self.clear();
        used
    }

    /// Reference to the spill sink.
    #[inline]
    #[must_use]
    pub fn spill_sink(&self) -> &S {
        &self.spill
    }

    /// Mutable reference to the spill sink.
    #[inline]
    #[must_use]
    pub fn spill_sink_mut(&mut self) -> &mut S {
        &mut self.spill
    }

    /// Release the backing storage.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.storage
    }

    fn evict(&mut self, n: usize) {
        debug_assert!(n <= self.used_space());
        let (head, tail) = segments(self.read, n, self.capacity);
        let buf = self.storage.as_ref();
        self.spill.spill(&buf[head], &buf[tail]);
        self.discard(n);
    }

    #[inline]
    fn discard(&mut self, n: usize) {
        debug_assert!(n <= self.used_space());
        self.read.advance(n, self.capacity);
        self.free += n;
        debug_assert!(self.read.get() < self.capacity && self.write.get() < self.capacity);
    }
}

impl<B, S> fmt::Debug for ByteRing<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRing")
            .field("capacity", &self.capacity)
            .field("read", &self.read.get())
            .field("write", &self.write.get())
            .field("free", &self.free)
            .finish_non_exhaustive()
    }
}

impl<B: Storage, S: Spill> RingInfo for ByteRing<B, S> {
    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn len(&self) -> usize {
        self.used_space()
    }

    #[inline]
    fn free_space(&self) -> usize {
        self.free
    }
}

impl<B: Storage, S: Spill> ByteWriter for ByteRing<B, S> {
    #[inline]
    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.write(data)
    }
}

impl<B: Storage, S: Spill> ByteReader for ByteRing<B, S> {
    #[inline]
    fn available(&self) -> usize {
        self.used_space()
    }

    #[inline]
    fn peek_bytes(&self, dest: &mut [u8], offset: usize) -> Result<()> {
        self.peek(dest, offset)
    }

    #[inline]
    fn consume(&mut self, n: usize) -> Result<()> {
        self.erase(n)
    }
}
