extern crate std;

use std::{vec, vec::Vec};

use crate::{ByteRing, CollectSpill, FramedRing, HEADER_LEN, RingError};

fn drain<B: crate::Storage, S: crate::Spill>(ring: &mut FramedRing<B, S>) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    while !ring.is_empty() {
        let mut buf = vec![0u8; ring.first_size().unwrap()];
        ring.copy_first(&mut buf).unwrap();
        ring.remove_first().unwrap();
        out.push(buf);
    }
    out
}

#[test]
fn new_ring_is_empty() {
    let ring = FramedRing::with_capacity(32).unwrap();
    assert!(ring.is_empty());
    assert_eq!(ring.len(), 0);
    assert_eq!(ring.capacity(), 32);
    assert_eq!(ring.free_space(), 32);
    assert_eq!(ring.max_payload(), 32 - HEADER_LEN);
    assert_eq!(ring.first_size().unwrap_err(), RingError::Empty);
}

#[test]
fn capacity_below_header_is_rejected() {
    assert_eq!(
        FramedRing::new([0u8; 3]).unwrap_err(),
        RingError::CapacityTooSmall {
            capacity: 3,
            minimum: HEADER_LEN
        }
    );
}

#[test]
fn entries_come_back_in_order() {
    let mut ring = FramedRing::with_capacity(100).unwrap();
    ring.append(&[1; 5]).unwrap();
    ring.append(&[2; 3]).unwrap();
    ring.append(&[3; 4]).unwrap();

    assert_eq!(ring.len(), 3);
    assert_eq!(ring.used_space(), 3 * HEADER_LEN + 12);

    let sizes: Vec<usize> = (0..3)
        .map(|_| {
            let size = ring.first_size().unwrap();
            assert_eq!(ring.remove_first().unwrap(), HEADER_LEN + size);
            size
        })
        .collect();
    assert_eq!(sizes, vec![5, 3, 4]);
    assert!(ring.is_empty());
}

#[test]
fn payloads_round_trip_in_fifo_order() {
    let mut ring = FramedRing::with_capacity(100).unwrap();
    ring.append(b"hello").unwrap();
    ring.append(b"abc").unwrap();
    ring.append(b"wxyz").unwrap();

    assert_eq!(
        drain(&mut ring),
        vec![b"hello".to_vec(), b"abc".to_vec(), b"wxyz".to_vec()]
    );
}

#[test]
fn append_evicts_whole_entries_until_it_fits() {
    let entry = HEADER_LEN + 4;
    let mut ring = FramedRing::with_capacity(3 * entry).unwrap();
    ring.append(&[0xa; 4]).unwrap();
    ring.append(&[0xb; 4]).unwrap();
    ring.append(&[0xc; 4]).unwrap();
    assert!(ring.is_full());

    ring.append(&[0xd; 10]).unwrap();

    assert_eq!(ring.len(), 2);
    assert_eq!(ring.used_space(), entry + HEADER_LEN + 10);
    assert_eq!(drain(&mut ring), vec![vec![0xc; 4], vec![0xd; 10]]);
}

#[test]
fn single_eviction_when_one_entry_frees_enough() {
    let mut ring = FramedRing::with_capacity(24).unwrap();
    ring.append(&[1; 6]).unwrap();
    ring.append(&[2; 6]).unwrap();
    ring.append(&[3; 2]).unwrap();

    assert_eq!(ring.len(), 2);
    assert_eq!(drain(&mut ring), vec![vec![2; 6], vec![3; 2]]);
}

#[test]
fn oversized_entry_is_rejected() {
    let mut ring = FramedRing::with_capacity(16).unwrap();
    ring.append(&[1; 4]).unwrap();

    assert_eq!(
        ring.append(&[0; 13]).unwrap_err(),
        RingError::ExceedsCapacity {
            len: 13 + HEADER_LEN,
            capacity: 16
        }
    );
    assert_eq!(ring.len(), 1);

    // Largest payload fits and evicts everything else.
    ring.append(&[9; 12]).unwrap();
    assert_eq!(ring.len(), 1);
    assert!(ring.is_full());
}

#[test]
fn header_split_across_wrap() {
    let mut ring = FramedRing::with_capacity(10).unwrap();
    ring.append(&[1, 2, 3]).unwrap(); // bytes 0..7
    ring.remove_first().unwrap();
    ring.append(&[4, 5]).unwrap(); // header at 7..10 and 0, payload 1..3

    assert_eq!(ring.first_size().unwrap(), 2);
    let mut out = [0u8; 2];
    assert_eq!(ring.copy_first(&mut out).unwrap(), 2);
    assert_eq!(out, [4, 5]);
}

#[test]
fn payload_split_across_wrap() {
    let mut ring = FramedRing::with_capacity(12).unwrap();
    ring.append(&[0; 2]).unwrap();
    ring.remove_first().unwrap();
    ring.append(&[1, 2, 3, 4, 5]).unwrap(); // header 6..10, payload 10..12 then 0..3

    let entry = ring.iter().next().unwrap();
    assert_eq!(entry.segments(), (&[1, 2][..], &[3, 4, 5][..]));
    assert_eq!(drain(&mut ring), vec![vec![1, 2, 3, 4, 5]]);
}

#[test]
fn empty_payloads_are_entries() {
    let mut ring = FramedRing::with_capacity(8).unwrap();
    ring.append(&[]).unwrap();
    ring.append(&[]).unwrap();
    assert_eq!(ring.len(), 2);
    assert!(ring.is_full());

    ring.append(&[]).unwrap();
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.first_size().unwrap(), 0);
}

#[test]
fn copy_first_is_read_only() {
    let mut ring = FramedRing::with_capacity(32).unwrap();
    ring.append(b"peek").unwrap();

    let mut a = [0u8; 8];
    let mut b = [0u8; 8];
    ring.copy_first(&mut a).unwrap();
    ring.copy_first(&mut b).unwrap();
    assert_eq!(a, b);
    assert_eq!(ring.len(), 1);
    assert_eq!(ring.used_space(), HEADER_LEN + 4);

    let mut small = [0u8; 3];
    assert_eq!(
        ring.copy_first(&mut small).unwrap_err(),
        RingError::BufferTooSmall {
            needed: 4,
            available: 3
        }
    );
}

#[test]
fn remove_on_empty_fails() {
    let mut ring = FramedRing::with_capacity(8).unwrap();
    assert_eq!(ring.remove_first().unwrap_err(), RingError::Empty);
    let mut out = [0u8; 4];
    assert_eq!(ring.copy_first(&mut out).unwrap_err(), RingError::Empty);
}

#[test]
fn iter_visits_every_entry() {
    let mut ring = FramedRing::with_capacity(20).unwrap();
    for payload in [&b"one"[..], &b"two"[..], &b"three"[..], &b"four"[..]] {
        ring.append(payload).unwrap();
    }

    let entries: Vec<Vec<u8>> = ring.iter().map(|e| e.to_vec()).collect();
    assert_eq!(entries, vec![b"three".to_vec(), b"four".to_vec()]);
    assert_eq!(ring.iter().len(), 2);

    let first = ring.iter().next().unwrap();
    assert!(first == &b"three"[..]);
    assert_eq!(first.len(), 5);

    let mut buf = [0u8; 5];
    assert_eq!(first.copy_to(&mut buf).unwrap(), 5);
    assert_eq!(&buf, b"three");
}

#[test]
fn reset_clears_entries() {
    let mut ring = FramedRing::with_capacity(16).unwrap();
    ring.append(&[1, 2]).unwrap();
    ring.append(&[3]).unwrap();
    ring.reset();

    assert!(ring.is_empty());
    assert_eq!(ring.free_space(), 16);
    ring.append(&[4; 12]).unwrap();
    assert_eq!(drain(&mut ring), vec![vec![4; 12]]);
}

#[test]
fn from_ring_clears_existing_bytes() {
    let mut bytes = ByteRing::new([0u8; 16]).unwrap();
    bytes.write(&[1, 2, 3]).unwrap();

    let mut ring = FramedRing::from_ring(bytes).unwrap();
    assert!(ring.is_empty());
    assert_eq!(ring.free_space(), 16);

    ring.append(&[5, 6]).unwrap();
    let inner = ring.into_inner();
    assert_eq!(inner.used_space(), HEADER_LEN + 2);
}

#[test]
fn header_is_little_endian_u32() {
    let mut ring = FramedRing::new([0u8; 12]).unwrap();
    ring.append(&[0xee; 3]).unwrap();

    let storage = ring.into_inner().into_inner();
    assert_eq!(storage[..HEADER_LEN], [3, 0, 0, 0]);
    assert_eq!(storage[HEADER_LEN..HEADER_LEN + 3], [0xee; 3]);
}

#[test]
fn eviction_spills_payloads() {
    let mut ring = FramedRing::with_spill([0u8; 16], CollectSpill::new()).unwrap();
    ring.append(b"ab").unwrap();
    ring.append(b"cde").unwrap();
    ring.append(b"fghi").unwrap(); // evicts "ab"

    assert_eq!(ring.spill_sink().units(), &[b"ab".to_vec()]);

    ring.remove_first().unwrap();
    assert_eq!(ring.spill_sink().units().len(), 1);

    let flushed: usize = ring.flush();
    assert_eq!(flushed, 1);
    assert!(ring.is_empty());
    assert_eq!(
        ring.spill_sink().units(),
        &[b"ab".to_vec(), b"fghi".to_vec()]
    );
}

#[test]
fn eviction_releases_header_and_payload_together() {
    let mut ring = FramedRing::with_spill([0u8; 13], CollectSpill::new()).unwrap();
    let mut expected_spill = Vec::new();
    let mut live: Vec<Vec<u8>> = Vec::new();

    for i in 0..50u8 {
        let payload = vec![i; usize::from(i % 5)];
        let entry = HEADER_LEN + payload.len();
        while live.iter().map(|e| HEADER_LEN + e.len()).sum::<usize>() + entry > 13 {
            expected_spill.push(live.remove(0));
        }
        ring.append(&payload).unwrap();
        live.push(payload);

        assert_eq!(ring.len(), live.len());
        assert_eq!(
            ring.used_space(),
            live.iter().map(|e| HEADER_LEN + e.len()).sum::<usize>()
        );
    }

    assert_eq!(ring.spill_sink().units(), &expected_spill[..]);
    assert_eq!(drain(&mut ring), live);
}

#[test]
fn flush_on_empty_ring_is_zero() {
    let mut ring = FramedRing::with_spill([0u8; 8], CollectSpill::new()).unwrap();
    assert_eq!(ring.flush(), 0);
    assert!(ring.spill_sink().units().is_empty());
}
