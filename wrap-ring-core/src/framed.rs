//! Length-framed ring of variable-size entries.
//!
//! Each entry is stored in a [`ByteRing`] as a [`HEADER_LEN`]-byte
//! little-endian `u32` payload length followed by the payload. The occupied
//! range always holds whole entries: eviction and removal release header and
//! payload together.

use core::fmt;
use core::iter::FusedIterator;

use byteorder::LittleEndian;
use snafu::{OptionExt, ensure};
use tracing::{debug, trace};

use crate::byte_ring::ByteRing;
use crate::error::{
    BufferTooSmallSnafu, CapacityTooSmallSnafu, EmptySnafu, ExceedsCapacitySnafu, Result,
};
use crate::spill::{DropSpill, Spill};
use crate::traits::{ByteReader, ByteWriter, RecordConsumer, RecordProducer, RingInfo, Storage};

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};

/// Bytes taken by each entry's length header.
pub const HEADER_LEN: usize = 4;

/// Ring of variable-length entries over a [`ByteRing`].
///
/// Appending an entry that does not fit in the free space evicts whole
/// entries, oldest first, until it does.
///
/// ```
/// use wrap_ring_core::FramedRing;
///
/// let mut storage = [0u8; 16];
/// let mut ring = FramedRing::new(&mut storage[..]).unwrap();
/// ring.append(b"hello").unwrap();
/// ring.append(b"abc").unwrap();
///
/// let mut buf = [0u8; 8];
/// let n = ring.copy_first(&mut buf).unwrap();
/// assert_eq!(&buf[..n], b"hello");
/// ```
pub struct FramedRing<B, S = DropSpill> {
    ring: ByteRing<B>,
    count: usize,
    spill: S,
}

impl<B: Storage> FramedRing<B, DropSpill> {
    /// Create a framed ring over `storage`; evicted entries are discarded.
    pub fn new(storage: B) -> Result<Self> {
        Self::with_spill(storage, DropSpill)
    }

    /// Frame entries inside an existing byte ring. Its contents are cleared.
    pub fn from_ring(ring: ByteRing<B>) -> Result<Self> {
        Self::from_ring_with_spill(ring, DropSpill)
    }
}

#[cfg(feature = "alloc")]
impl FramedRing<Box<[u8]>, DropSpill> {
    /// Create a framed ring over `capacity` bytes of owned storage.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::from_ring(ByteRing::with_capacity(capacity)?)
    }
}

impl<B: Storage, S: Spill> FramedRing<B, S> {
    /// Create a framed ring that hands evicted payloads to `spill`.
    pub fn with_spill(storage: B, spill: S) -> Result<Self> {
        Self::from_ring_with_spill(ByteRing::new(storage)?, spill)
    }

    /// Frame entries inside `ring`, spilling evicted payloads to `spill`.
    /// The ring's contents are cleared.
    pub fn from_ring_with_spill(mut ring: ByteRing<B>, spill: S) -> Result<Self> {
        let capacity = ring.capacity();
        ensure!(
            capacity >= HEADER_LEN,
            CapacityTooSmallSnafu {
                capacity,
                minimum: HEADER_LEN,
            }
        );
        ring.clear();
        debug!(capacity, max_payload = capacity - HEADER_LEN, "created framed ring");

        Ok(Self {
            ring,
            count: 0,
            spill,
        })
    }

    /// Total capacity in bytes, headers included.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Largest payload a single entry may carry.
    #[inline]
    #[must_use]
    pub fn max_payload(&self) -> usize {
        self.ring.capacity() - HEADER_LEN
    }

    /// Bytes free in the underlying ring.
    #[inline]
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.ring.free_space()
    }

    /// Bytes used by stored entries, headers included.
    #[inline]
    #[must_use]
    pub fn used_space(&self) -> usize {
        self.ring.used_space()
    }

    /// Number of stored entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if no entries are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True if every byte of the underlying ring is in use.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Append `data` as one entry, evicting the oldest entries until it fits.
    ///
    /// Fails when the payload plus its header exceeds the ring capacity.
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        let capacity = self.ring.capacity();
        let entry_size = data.len().saturating_add(HEADER_LEN);
        ensure!(
            entry_size <= capacity,
            ExceedsCapacitySnafu {
                len: entry_size,
                capacity,
            }
        );
        let header = u32::try_from(data.len()).ok().context(ExceedsCapacitySnafu {
            len: entry_size,
            capacity: (u32::MAX as usize).saturating_add(HEADER_LEN),
        })?;

        let mut freed = self.ring.free_space();
        if freed < entry_size {
            let mut evicted = 0usize;
            while freed < entry_size {
                freed += self.evict_oldest()?;
                evicted += 1;
            }
            trace!(evicted, freed, entry_size, "framed ring full, evicted oldest entries");
        }
        debug_assert_eq!(freed, self.ring.free_space());

        self.ring.write_u32::<LittleEndian>(header)?;
        self.ring.write(data)?;
        self.count += 1;
        Ok(())
    }

    /// Payload length of the oldest entry.
    pub fn first_size(&self) -> Result<usize> {
        ensure!(!self.is_empty(), EmptySnafu);
        self.entry_len(0)
    }

    /// Copy the oldest payload into the front of `dest` without removing it.
    /// Returns the payload length.
    pub fn copy_first(&self, dest: &mut [u8]) -> Result<usize> {
        let len = self.first_size()?;
        ensure!(
            dest.len() >= len,
            BufferTooSmallSnafu {
                needed: len,
                available: dest.len(),
            }
        );
        self.ring.peek(&mut dest[..len], HEADER_LEN)?;
        Ok(len)
    }

    /// Remove the oldest entry. Nothing is spilled.
    /// Returns the bytes released, header included.
    pub fn remove_first(&mut self) -> Result<usize> {
        ensure!(!self.is_empty(), EmptySnafu);
        self.erase_oldest()
    }

    /// Iterate entries oldest to newest without removing them.
    pub fn iter(&self) -> EntryIter<'_, B> {
        EntryIter {
            ring: &self.ring,
            offset: 0,
            remaining: self.count,
        }
    }

    /// Remove all entries.
    pub fn reset(&mut self) {
        trace!(discarded = self.count, "resetting framed ring");
        self.ring.clear();
        self.count = 0;
    }

    /// Spill every stored payload, oldest first, and empty the ring.
    /// Returns the number of entries flushed.
    pub fn flush(&mut self) -> usize {
        let flushed = self.count;
        trace!(flushed, "flushing framed ring to spill");
        while !self.is_empty() {
            let evicted = self.evict_oldest();
            debug_assert!(evicted.is_ok());
            if evicted.is_err() {
                break;
            }
        }
        self.reset();
        flushed
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

    /// Release the underlying byte ring.
    #[must_use]
    pub fn into_inner(self) -> ByteRing<B> {
        self.ring
    }

    fn entry_len(&self, offset: usize) -> Result<usize> {
        let len = self.ring.peek_u32::<LittleEndian>(offset)? as usize;
        debug_assert!(offset + HEADER_LEN + len <= self.ring.used_space());
        Ok(len)
    }

    /// Spill the oldest payload, then erase its entry.
    fn evict_oldest(&mut self) -> Result<usize> {
        debug_assert!(!self.is_empty());
        let len = self.entry_len(0)?;
        let (head, tail) = self.ring.segments(HEADER_LEN, len)?;
        self.spill.spill(head, tail);
        self.erase_entry(len)
    }

    /// Erase the oldest entry without spilling it.
    fn erase_oldest(&mut self) -> Result<usize> {
        let len = self.entry_len(0)?;
        self.erase_entry(len)
    }

    /// Erase header and `len` payload bytes of the oldest entry as one unit.
    fn erase_entry(&mut self, len: usize) -> Result<usize> {
        let total = HEADER_LEN + len;
        self.ring.erase(total)?;
        self.count -= 1;
        Ok(total)
    }
}

impl<B, S> fmt::Debug for FramedRing<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramedRing")
            .field("ring", &self.ring)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<'a, B: Storage, S: Spill> IntoIterator for &'a FramedRing<B, S> {
    type Item = Entry<'a>;
    type IntoIter = EntryIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowed view of one stored payload.
///
/// The payload may wrap around the end of the backing storage, so it is
/// exposed as two segments.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    head: &'a [u8],
    tail: &'a [u8],
}

impl<'a> Entry<'a> {
    /// Payload length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// True for a zero-length payload.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contiguous part and the wrapped remainder.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> (&'a [u8], &'a [u8]) {
        (self.head, self.tail)
    }

    /// Copy the payload into the front of `dest`. Returns the payload length.
    pub fn copy_to(&self, dest: &mut [u8]) -> Result<usize> {
        let len = self.len();
        ensure!(
            dest.len() >= len,
            BufferTooSmallSnafu {
                needed: len,
                available: dest.len(),
            }
        );
        dest[..self.head.len()].copy_from_slice(self.head);
        dest[self.head.len()..len].copy_from_slice(self.tail);
        Ok(len)
    }

    /// Payload as an owned buffer.
    #[cfg(feature = "alloc")]
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.head);
        out.extend_from_slice(self.tail);
        out
    }
}

impl PartialEq<[u8]> for Entry<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.len() == other.len()
            && self.head == &other[..self.head.len()]
            && self.tail == &other[self.head.len()..]
    }
}

impl PartialEq<&[u8]> for Entry<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        *self == **other
    }
}

/// Iterator over the entries of a [`FramedRing`], oldest first.
#[derive(Debug)]
pub struct EntryIter<'a, B> {
    ring: &'a ByteRing<B>,
    offset: usize,
    remaining: usize,
}

impl<'a, B: Storage> Iterator for EntryIter<'a, B> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let ring = self.ring;
        let len = ring.peek_u32::<LittleEndian>(self.offset).ok()? as usize;
        let (head, tail) = ring.segments(self.offset + HEADER_LEN, len).ok()?;
        self.offset += HEADER_LEN + len;
        self.remaining -= 1;
        Some(Entry { head, tail })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<B: Storage> ExactSizeIterator for EntryIter<'_, B> {}

impl<B: Storage> FusedIterator for EntryIter<'_, B> {}

impl<B: Storage, S: Spill> RingInfo for FramedRing<B, S> {
    #[inline]
    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    fn len(&self) -> usize {
        self.count
    }

    #[inline]
    fn free_space(&self) -> usize {
        self.ring.free_space()
    }
}

impl<B: Storage, S: Spill> RecordProducer for FramedRing<B, S> {
    #[inline]
    fn push_record(&mut self, record: &[u8]) -> Result<()> {
        self.append(record)
    }
}

impl<B: Storage, S: Spill> RecordConsumer for FramedRing<B, S> {
    #[inline]
    fn front_len(&self) -> Option<usize> {
        self.first_size().ok()
    }

    #[inline]
    fn copy_front(&self, dest: &mut [u8]) -> Result<usize> {
        self.copy_first(dest)
    }

    #[inline]
    fn remove_front(&mut self) -> Result<usize> {
        self.remove_first()
    }
}
