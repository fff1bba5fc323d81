//! Slice-backed backup memory
//!
//! Wraps a caller-owned byte region, such as a linker section placed in
//! retained RAM, as a `BackupMemory` device.

use crate::platform::{error::MemoryError, traits::BackupMemory, Result};

/// Backup memory over a borrowed byte slice
///
/// # Example
///
/// ```
/// use retained_kv::platform::{BackupMemory, SliceMemory};
///
/// let mut region = [0u8; 64];
/// let mut memory = SliceMemory::new(&mut region);
///
/// memory.write(8, &[1, 2, 3]).unwrap();
/// let mut buf = [0u8; 3];
/// assert_eq!(memory.read(8, &mut buf).unwrap(), 3);
/// assert_eq!(buf, [1, 2, 3]);
/// ```
#[derive(Debug)]
pub struct SliceMemory<'a> {
    region: &'a mut [u8],
}

impl<'a> SliceMemory<'a> {
    /// Wrap `region`
    ///
    /// Regions larger than `u32::MAX` bytes are truncated to that capacity.
    pub fn new(region: &'a mut [u8]) -> Self {
        let len = region.len().min(u32::MAX as usize);
        Self {
            region: &mut region[..len],
        }
    }

    /// Raw contents of the region
    pub fn as_slice(&self) -> &[u8] {
        self.region
    }

    fn range(&self, address: u32, len: usize) -> Result<core::ops::Range<usize>> {
        let start = address as usize;
        let end = start.checked_add(len).ok_or(MemoryError::OutOfBounds)?;
        if end > self.region.len() {
            return Err(MemoryError::OutOfBounds.into());
        }
        Ok(start..end)
    }
}

impl BackupMemory for SliceMemory<'_> {
    fn capacity(&self) -> u32 {
        self.region.len() as u32
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<usize> {
        let range = self.range(address, buf.len())?;
        buf.copy_from_slice(&self.region[range]);
        Ok(buf.len())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let range = self.range(address, data.len())?;
        self.region[range].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformError;

    #[test]
    fn test_slice_memory_read_write() {
        let mut region = [0u8; 16];
        let mut memory = SliceMemory::new(&mut region);

        memory.write(12, &[0xAB; 4]).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(memory.read(12, &mut buf).unwrap(), 4);
        assert_eq!(buf, [0xAB; 4]);
        assert_eq!(memory.capacity(), 16);
    }

    #[test]
    fn test_slice_memory_out_of_bounds() {
        let mut region = [0u8; 16];
        let mut memory = SliceMemory::new(&mut region);

        assert_eq!(
            memory.write(14, &[0; 4]),
            Err(PlatformError::Memory(MemoryError::OutOfBounds))
        );
        let mut buf = [0u8; 1];
        assert!(memory.read(16, &mut buf).is_err());
        assert!(memory.as_slice().iter().all(|&b| b == 0));
    }
}
