//! Error types for ring buffer operations.

use snafu::Snafu;

/// Error returned when a ring operation is given arguments it cannot honour.
///
/// Eviction is never an error: a write that does not fit in the free space
/// silently discards the oldest data. These variants only cover requests that
/// no amount of eviction could satisfy, reads past the stored data, and
/// malformed construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RingError {
    /// Backing storage has zero length.
    #[snafu(display("ring capacity must be greater than zero"))]
    ZeroCapacity,

    /// Backing storage is too small for the ring's framing.
    #[snafu(display("ring capacity {capacity} is below the minimum of {minimum} bytes"))]
    CapacityTooSmall {
        /// Capacity supplied.
        capacity: usize,
        /// Smallest usable capacity.
        minimum: usize,
    },

    /// Element size is zero or larger than the backing storage.
    #[snafu(display("element size {element_size} does not fit a capacity of {capacity} bytes"))]
    InvalidElementSize {
        /// Element size supplied.
        element_size: usize,
        /// Capacity of the backing storage.
        capacity: usize,
    },

    /// A single write or entry is larger than the whole ring.
    #[snafu(display("{len} bytes exceed the ring capacity of {capacity}"))]
    ExceedsCapacity {
        /// Bytes requested, including framing.
        len: usize,
        /// Total capacity.
        capacity: usize,
    },

    /// Read, peek or erase past the stored data.
    #[snafu(display("requested {requested} bytes but only {available} are stored"))]
    InsufficientData {
        /// Bytes requested, including any offset.
        requested: usize,
        /// Bytes currently stored.
        available: usize,
    },

    /// The ring holds no records.
    #[snafu(display("ring is empty"))]
    Empty,

    /// Destination buffer cannot hold the record.
    #[snafu(display("buffer too small: needed {needed} bytes, only {available} available"))]
    BufferTooSmall {
        /// Bytes needed.
        needed: usize,
        /// Bytes available in the destination.
        available: usize,
    },

    /// Appended element does not match the ring's element size.
    #[snafu(display("element of {actual} bytes does not match the element size of {expected}"))]
    ElementMismatch {
        /// Configured element size.
        expected: usize,
        /// Length of the rejected element.
        actual: usize,
    },
}

/// Result type for ring operations.
pub type Result<T, E = RingError> = core::result::Result<T, E>;
