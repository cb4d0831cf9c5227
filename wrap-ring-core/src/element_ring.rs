//! Ring of fixed-size elements with overwrite-on-full.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;

use snafu::ensure;
use tracing::{debug, trace};

use crate::error::{
    BufferTooSmallSnafu, ElementMismatchSnafu, EmptySnafu, InvalidElementSizeSnafu, Result,
    ZeroCapacitySnafu,
};
use crate::index::Index;
use crate::spill::{DropSpill, Spill};
use crate::traits::{RecordConsumer, RecordProducer, RingInfo, Storage};

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec};

/// Ring of equally sized byte records.
///
/// Storage is split into `capacity / element_size` slots; trailing bytes that
/// do not fill a whole slot stay unused. Appending to a full ring evicts
/// exactly one element, the oldest.
///
/// ```
/// use wrap_ring_core::ElementRing;
///
/// let mut ring = ElementRing::new([0u8; 4], 2).unwrap();
/// ring.append(&[1, 1]).unwrap();
/// ring.append(&[2, 2]).unwrap();
/// ring.append(&[3, 3]).unwrap(); // evicts [1, 1]
///
/// assert_eq!(ring.first(), Some(&[2, 2][..]));
/// ```
pub struct ElementRing<B, S = DropSpill> {
    storage: B,
    element_size: usize,
    slots: usize,
    read: Index,
    write: Index,
    count: usize,
    spill: S,
}

impl<B: Storage> ElementRing<B, DropSpill> {
    /// Create a ring of `element_size`-byte slots over `storage`; evicted
    /// elements are discarded.
    pub fn new(storage: B, element_size: usize) -> Result<Self> {
        Self::with_spill(storage, element_size, DropSpill)
    }
}

#[cfg(feature = "alloc")]
impl ElementRing<Box<[u8]>, DropSpill> {
    /// Create a ring with `slots` slots of `element_size` bytes over owned
    /// storage.
    pub fn with_capacity(slots: usize, element_size: usize) -> Result<Self> {
        let Some(bytes) = slots.checked_mul(element_size) else {
            return crate::error::ExceedsCapacitySnafu {
                len: slots,
                capacity: usize::MAX / element_size,
            }
            .fail();
        };
        Self::new(vec![0u8; bytes].into_boxed_slice(), element_size)
    }
}

impl<B: Storage, S: Spill> ElementRing<B, S> {
    /// Create a ring that hands evicted elements to `spill`.
    pub fn with_spill(storage: B, element_size: usize, spill: S) -> Result<Self> {
        let capacity = storage.as_ref().len();
        ensure!(capacity > 0, ZeroCapacitySnafu);
        ensure!(
            element_size > 0 && element_size <= capacity,
            InvalidElementSizeSnafu {
                element_size,
                capacity,
            }
        );

        let slots = capacity / element_size;
        debug!(capacity, element_size, slots, "created element ring");

        Ok(Self {
            storage,
            element_size,
            slots,
            read: Index::zero(),
            write: Index::zero(),
            count: 0,
            spill,
        })
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots
    }

    /// Size of every element in bytes.
    #[inline]
    #[must_use]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Elements currently stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Slots that can be filled without eviction.
    #[inline]
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.slots - self.count
    }

    /// True if no elements are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True once the write position has caught up with the read position.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        let full = self.count > 0 && self.read == self.write;
        debug_assert_eq!(full, self.count == self.slots);
        full
    }

    /// Append one element, evicting the oldest if every slot is taken.
    ///
    /// `element` must be exactly [`element_size`](Self::element_size) bytes.
    pub fn append(&mut self, element: &[u8]) -> Result<()> {
        ensure!(
            element.len() == self.element_size,
            ElementMismatchSnafu {
                expected: self.element_size,
                actual: element.len(),
            }
        );

        if self.is_full() {
            trace!(slots = self.slots, "element ring full, evicting oldest element");
            self.evict_first();
        }

        let slot = self.slot(self.write);
        self.storage.as_mut()[slot].copy_from_slice(element);
        self.write.advance(1, self.slots);
        self.count += 1;
        Ok(())
    }

    /// Copy the oldest element into the front of `dest`. Returns the element
    /// size.
    pub fn copy_first(&self, dest: &mut [u8]) -> Result<usize> {
        let Some(first) = self.first() else {
            return EmptySnafu.fail();
        };
        ensure!(
            dest.len() >= first.len(),
            BufferTooSmallSnafu {
                needed: first.len(),
                available: dest.len(),
            }
        );
        dest[..first.len()].copy_from_slice(first);
        Ok(first.len())
    }

    /// Remove the oldest element. Nothing is spilled.
    pub fn remove_first(&mut self) -> Result<usize> {
        ensure!(!self.is_empty(), EmptySnafu);
        self.discard_first();
        Ok(self.element_size)
    }

    /// Borrow the oldest element.
    #[must_use]
    pub fn first(&self) -> Option<&[u8]> {
        self.get(0)
    }

    /// Borrow the newest element.
    #[must_use]
    pub fn last(&self) -> Option<&[u8]> {
        self.count.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Borrow element `index`, 0 being the oldest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let slot = self.slot(self.read.offset(index, self.slots));
        Some(&self.storage.as_ref()[slot])
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> ElementIter<'_> {
        ElementIter {
            buf: self.storage.as_ref(),
            element_size: self.element_size,
            slots: self.slots,
            next: self.read,
            remaining: self.count,
        }
    }

    /// Empty the ring. Storage and element size are kept.
    pub fn reset(&mut self) {
        trace!(discarded = self.count, "resetting element ring");
        self.read = Index::zero();
        self.write = Index::zero();
        self.count = 0;
    }

    /// Spill every stored element, oldest first, and empty the ring.
    /// Returns the number of elements flushed.
    pub fn flush(&mut self) -> usize {
        let flushed = self.count;
        trace!(flushed, "flushing element ring to spill");
        while !self.is_empty() {
            self.evict_first();
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

    /// Release the backing storage.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.storage
    }

    #[inline]
    fn slot(&self, index: Index) -> Range<usize> {
        debug_assert!(index.get() < self.slots);
        let start = index.get() * self.element_size;
        start..start + self.element_size
    }

    fn evict_first(&mut self) {
        debug_assert!(!self.is_empty());
        let slot = self.slot(self.read);
        self.spill.spill(&self.storage.as_ref()[slot], &[]);
        self.discard_first();
    }

    #[inline]
    fn discard_first(&mut self) {
        self.read.advance(1, self.slots);
        self.count -= 1;
    }
}

impl<B, S> fmt::Debug for ElementRing<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRing")
            .field("element_size", &self.element_size)
            .field("slots", &self.slots)
            .field("read", &self.read.get())
            .field("write", &self.write.get())
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<'a, B: Storage, S: Spill> IntoIterator for &'a ElementRing<B, S> {
    type Item = &'a [u8];
    type IntoIter = ElementIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`ElementRing`], oldest first.
#[derive(Debug, Clone)]
pub struct ElementIter<'a> {
    buf: &'a [u8],
    element_size: usize,
    slots: usize,
    next: Index,
    remaining: usize,
}

impl<'a> Iterator for ElementIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let start = self.next.get() * self.element_size;
        self.next.advance(1, self.slots);
        self.remaining -= 1;
        Some(&self.buf[start..start + self.element_size])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ElementIter<'_> {}

impl FusedIterator for ElementIter<'_> {}

impl<B: Storage, S: Spill> RingInfo for ElementRing<B, S> {
    #[inline]
    fn capacity(&self) -> usize {
        self.slots
    }

    #[inline]
    fn len(&self) -> usize {
        self.count
    }

    #[inline]
    fn free_space(&self) -> usize {
        self.free_slots()
    }

    #[inline]
    fn is_full(&self) -> bool {
        ElementRing::is_full(self)
    }
}

impl<B: Storage, S: Spill> RecordProducer for ElementRing<B, S> {
    #[inline]
    fn push_record(&mut self, record: &[u8]) -> Result<()> {
        self.append(record)
    }
}

impl<B: Storage, S: Spill> RecordConsumer for ElementRing<B, S> {
    #[inline]
    fn front_len(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.element_size)
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
