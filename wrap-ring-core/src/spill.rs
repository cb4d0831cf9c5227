//! Spill sinks: where evicted data goes.
//!
//! A ring that must make room for a write hands each evicted unit to its
//! [`Spill`] before the bytes are overwritten. A unit is a run of bytes for
//! [`ByteRing`](crate::ByteRing), one element for
//! [`ElementRing`](crate::ElementRing) and one payload for
//! [`FramedRing`](crate::FramedRing). Because the data may straddle the end of
//! the backing array it arrives as two segments; `tail` is empty when the unit
//! was contiguous.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Receives evicted units.
pub trait Spill {
    /// Consume one evicted unit, `head` followed by `tail`.
    fn spill(&mut self, head: &[u8], tail: &[u8]);
}

impl<S: Spill + ?Sized> Spill for &mut S {
    #[inline]
    fn spill(&mut self, head: &[u8], tail: &[u8]) {
        (**self).spill(head, tail);
    }
}

/// Discards evicted data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropSpill;

impl Spill for DropSpill {
    #[inline]
    fn spill(&mut self, _head: &[u8], _tail: &[u8]) {}
}

/// Calls a closure for each evicted unit.
#[derive(Debug)]
pub struct FnSpill<F>(pub F);

impl<F: FnMut(&[u8], &[u8])> Spill for FnSpill<F> {
    #[inline]
    fn spill(&mut self, head: &[u8], tail: &[u8]) {
        (self.0)(head, tail);
    }
}

/// Collects each evicted unit into its own `Vec<u8>`.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default)]
pub struct CollectSpill {
    units: Vec<Vec<u8>>,
}

#[cfg(feature = "alloc")]
impl CollectSpill {
    /// Create an empty collecting sink.
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Units collected so far, oldest first.
    pub fn units(&self) -> &[Vec<u8>] {
        &self.units
    }

    /// Take collected units, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.units)
    }

    /// Consume the sink and return collected units.
    pub fn into_units(self) -> Vec<Vec<u8>> {
        self.units
    }
}

#[cfg(feature = "alloc")]
impl Spill for CollectSpill {
    fn spill(&mut self, head: &[u8], tail: &[u8]) {
        let mut unit = Vec::with_capacity(head.len() + tail.len());
        unit.extend_from_slice(head);
        unit.extend_from_slice(tail);
        self.units.push(unit);
    }
}
