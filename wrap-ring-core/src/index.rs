//! Bounded index arithmetic shared by every ring.
//!
//! All wraparound math lives here. Rings hold positions as [`Index`] values
//! and never compute `% capacity` themselves.

use core::ops::Range;

/// A position inside a ring of `capacity` slots, always `< capacity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct Index(usize);

impl Index {
    #[inline]
    pub(crate) const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub(crate) const fn get(self) -> usize {
        self.0
    }

    /// Position `n` slots past `self`, wrapping at `capacity`.
    #[inline]
    pub(crate) fn offset(self, n: usize, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        debug_assert!(self.0 < capacity);
        // `n % capacity` first so the sum cannot overflow.
        let n = n % capacity;
        let room = capacity - self.0;
        if n < room {
            Self(self.0 + n)
        } else {
            Self(n - room)
        }
    }

    /// Move `self` forward by `n` slots.
    #[inline]
    pub(crate) fn advance(&mut self, n: usize, capacity: usize) {
        *self = self.offset(n, capacity);
    }
}

/// Split a logical run of `len` slots starting at `start` into the contiguous
/// head segment and the wrapped tail segment.
///
/// The tail is empty when the run does not cross the end of the array.
#[inline]
pub(crate) fn segments(start: Index, len: usize, capacity: usize) -> (Range<usize>, Range<usize>) {
    debug_assert!(len <= capacity);
    debug_assert!(start.0 < capacity);
    let first = len.min(capacity - start.0);
    (start.0..start.0 + first, 0..len - first)
}
