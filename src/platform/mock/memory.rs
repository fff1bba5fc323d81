//! Mock backup memory implementation for testing
//!
//! Provides in-memory backup RAM simulation for unit and integration tests.

use crate::platform::{error::MemoryError, traits::BackupMemory, Result};
use alloc::vec;
use alloc::vec::Vec;

/// Mock backup memory
///
/// Simulates a fixed-capacity retained RAM region. Supports:
/// - Read/write operations with bounds checks
/// - Corruption injection for testing integrity handling
/// - Short-read and write-failure injection
/// - Power-loss simulation (next write only half completes)
/// - Device call counters for verifying chunked wraparound access
#[derive(Debug, Clone)]
pub struct MockBackupMemory {
    /// Memory contents (initialized to zero, like cleared SRAM)
    storage: Vec<u8>,
    /// Number of `read` calls issued
    read_calls: u32,
    /// Number of `write` calls issued
    write_calls: u32,
    /// Next read returns only this many bytes
    short_read: Option<usize>,
    /// Remaining writes before `WriteFailed` is injected
    fail_write_after: Option<u32>,
    /// Simulated power loss flag
    power_loss: bool,
}

impl MockBackupMemory {
    /// Create a zero-filled mock device of `capacity` bytes
    pub fn new(capacity: u32) -> Self {
        Self::filled(capacity, 0x00)
    }

    /// Create a mock device with every byte set to `fill`
    pub fn filled(capacity: u32, fill: u8) -> Self {
        Self {
            storage: vec![fill; capacity as usize],
            read_calls: 0,
            write_calls: 0,
            short_read: None,
            fail_write_after: None,
            power_loss: false,
        }
    }

    /// Get memory contents (for test verification)
    pub fn get_contents(&self, address: u32, len: usize) -> Vec<u8> {
        self.storage[address as usize..(address as usize + len)].to_vec()
    }

    /// Raw view of the whole region
    pub fn as_slice(&self) -> &[u8] {
        &self.storage
    }

    /// Inject corruption at address (for testing error recovery)
    ///
    /// XORs every byte in the range with `0xA5`, so the corrupted value always
    /// differs from the original.
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        let capacity = self.storage.len();
        for i in 0..len {
            let index = (address as usize + i) % capacity;
            self.storage[index] ^= 0xA5;
        }
    }

    /// Overwrite raw bytes without counting a device call
    pub fn poke(&mut self, address: u32, data: &[u8]) {
        let start = address as usize;
        self.storage[start..start + data.len()].copy_from_slice(data);
    }

    /// Make the next read return only `len` bytes
    pub fn inject_short_read(&mut self, len: usize) {
        self.short_read = Some(len);
    }

    /// Fail every write once `successful_writes` more writes have completed
    pub fn fail_writes_after(&mut self, successful_writes: u32) {
        self.fail_write_after = Some(successful_writes);
    }

    /// Stop injecting write failures
    pub fn clear_write_failures(&mut self) {
        self.fail_write_after = None;
    }

    /// Simulate power loss during next write operation
    ///
    /// The next write will only partially complete.
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// Number of device read calls issued so far
    pub fn read_calls(&self) -> u32 {
        self.read_calls
    }

    /// Number of device write calls issued so far
    pub fn write_calls(&self) -> u32 {
        self.write_calls
    }

    /// Reset both call counters
    pub fn reset_counters(&mut self) {
        self.read_calls = 0;
        self.write_calls = 0;
    }

    fn check_range(&self, address: u32, len: usize) -> Result<usize> {
        let start = address as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.storage.len() => Ok(start),
            _ => Err(MemoryError::OutOfBounds.into()),
        }
    }
}

impl BackupMemory for MockBackupMemory {
    fn capacity(&self) -> u32 {
        self.storage.len() as u32
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<usize> {
        self.read_calls += 1;
        let start = self.check_range(address, buf.len())?;

        let len = match self.short_read.take() {
            Some(limit) => limit.min(buf.len()),
            None => buf.len(),
        };
        buf[..len].copy_from_slice(&self.storage[start..start + len]);

        Ok(len)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.write_calls += 1;
        let start = self.check_range(address, data.len())?;

        if let Some(remaining) = self.fail_write_after {
            if remaining == 0 {
                return Err(MemoryError::WriteFailed.into());
            }
            self.fail_write_after = Some(remaining - 1);
        }

        // Simulate power loss (partial write)
        let write_len = if self.power_loss {
            self.power_loss = false;
            data.len() / 2
        } else {
            data.len()
        };

        self.storage[start..start + write_len].copy_from_slice(&data[..write_len]);

        Ok(())
    }
}
