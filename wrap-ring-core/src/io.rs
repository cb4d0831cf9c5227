//! `std::io` adapters for [`ByteRing`].

use std::io;

use crate::byte_ring::ByteRing;
use crate::spill::Spill;
use crate::traits::Storage;

/// Writes at most `capacity` bytes per call, evicting as usual.
impl<B: Storage, S: Spill> io::Write for ByteRing<B, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len().min(self.capacity());
        ByteRing::write(self, &buf[..len]).map_err(io::Error::other)?;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads whatever is stored, up to `buf.len()` bytes.
impl<B: Storage, S: Spill> io::Read for ByteRing<B, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.used_space());
        ByteRing::read(self, &mut buf[..len]).map_err(io::Error::other)?;
        Ok(len)
    }
}
