//! Backup memory interface trait
//!
//! This module defines the byte-addressed memory device the store persists to:
//! typically battery-backed SRAM or a retained RAM section that survives a reset.

use crate::platform::Result;

/// Backup memory interface trait
///
/// The device exposes a fixed-capacity, byte-addressed region. It knows nothing
/// about frames, keys or types; the store owns all wraparound and bounds logic
/// and only ever issues accesses that lie inside `[0, capacity)`.
///
/// # Invariants
///
/// - `capacity()` is fixed for the lifetime of the device
/// - Only one owner per device (no concurrent access)
/// - Writes are not atomic: an interrupted write may leave a partial update
pub trait BackupMemory {
    /// Total capacity in bytes
    fn capacity(&self) -> u32;

    /// Read `buf.len()` bytes starting at `address`
    ///
    /// Returns the number of bytes actually read, which may be fewer than
    /// requested.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Memory(MemoryError::OutOfBounds)` if the range
    /// exceeds the capacity, or `MemoryError::ReadFailed` on device failure.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<usize>;

    /// Write `data` starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Memory(MemoryError::OutOfBounds)` if the range
    /// exceeds the capacity, or `MemoryError::WriteFailed` on device failure.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;
}

impl<T: BackupMemory + ?Sized> BackupMemory for &mut T {
    fn capacity(&self) -> u32 {
        (**self).capacity()
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<usize> {
        (**self).read(address, buf)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write(address, data)
    }
}
