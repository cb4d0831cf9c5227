//! Core implementation for wrap_ring.
//!
//! Three fixed-capacity rings that never block and never grow: when a write
//! does not fit, the oldest data is evicted to make room.
//!
//! - [`ByteRing`]: raw bytes, arbitrary-length writes and reads.
//! - [`ElementRing`]: fixed-size records, one eviction per overflow.
//! - [`FramedRing`]: variable-length records framed by a length header,
//!   evicted whole.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod byte_ring;
mod element_ring;
pub mod error;
mod framed;
mod index;
#[cfg(feature = "std")]
mod io;
mod spill;
mod traits;

#[cfg(all(test, feature = "alloc"))]
mod tests;

pub use byte_ring::ByteRing;
pub use element_ring::{ElementIter, ElementRing};
pub use error::{Result, RingError};
pub use framed::{Entry, EntryIter, FramedRing, HEADER_LEN};
#[cfg(feature = "alloc")]
pub use spill::CollectSpill;
pub use spill::{DropSpill, FnSpill, Spill};
pub use traits::{
    ByteReader, ByteWriter, RecordConsumer, RecordProducer, RecordRing, RingInfo, Storage,
};

pub use byteorder::{BigEndian, ByteOrder, LittleEndian, NativeEndian};
