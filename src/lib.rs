//! `no_std` ring buffers that overwrite the oldest data when full.
//!
//! Writers never block and rings never grow. When new data does not fit,
//! whole units of the oldest data are evicted first and handed to the ring's
//! [`Spill`] sink (by default, [`DropSpill`] discards them).
//!
//! # Byte ring
//!
//! ```
//! use wrap_ring::ByteRing;
//!
//! let mut ring = ByteRing::with_capacity(4).unwrap();
//! ring.write(&[0x11, 0xbb, 0xaa, 0x47]).unwrap();
//! assert!(ring.is_full());
//!
//! ring.write(&[0x01]).unwrap(); // evicts 0x11
//! let mut out = [0u8; 4];
//! ring.peek(&mut out, 0).unwrap();
//! assert_eq!(out, [0xbb, 0xaa, 0x47, 0x01]);
//! ```
//!
//! # Element ring
//!
//! ```
//! use wrap_ring::ElementRing;
//!
//! let mut ring = ElementRing::with_capacity(2, 4).unwrap();
//! ring.append(b"AAAA").unwrap();
//! ring.append(b"BBBB").unwrap();
//! ring.append(b"CCCC").unwrap(); // evicts AAAA
//!
//! let mut out = [0u8; 4];
//! ring.copy_first(&mut out).unwrap();
//! assert_eq!(&out, b"BBBB");
//! ```
//!
//! # Framed ring
//!
//! ```
//! use wrap_ring::{CollectSpill, FramedRing};
//!
//! let storage = vec![0u8; 32].into_boxed_slice();
//! let mut ring = FramedRing::with_spill(storage, CollectSpill::new()).unwrap();
//! ring.append(b"first").unwrap();
//! ring.append(b"second").unwrap();
//! ring.append(b"third entry").unwrap(); // evicts "first"
//!
//! assert_eq!(ring.len(), 2);
//! assert_eq!(ring.spill_sink().units(), &[b"first".to_vec()]);
//! assert_eq!(ring.first_size().unwrap(), 6);
//! ```
//!
//! # Byte streams
//!
//! Rings speak the same [`ByteWriter`]/[`ByteReader`] interface as linear
//! buffers, with fixed-width integer helpers in an explicit byte order.
//!
//! ```
//! use wrap_ring::{BigEndian, ByteReader, ByteRing, ByteWriter};
//!
//! let mut storage = [0u8; 8];
//! let mut ring = ByteRing::new(&mut storage[..]).unwrap();
//! ring.write_u32::<BigEndian>(0xdead_beef).unwrap();
//! assert_eq!(ring.read_u32::<BigEndian>().unwrap(), 0xdead_beef);
//! ```

#![no_std]
#![warn(missing_docs)]

pub use wrap_ring_core::*;
