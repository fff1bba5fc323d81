//! Platform error types
//!
//! This module defines error types for backup memory device operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All device implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// Backup memory operation failed
    Memory(MemoryError),
    /// Device not initialized or powered down
    ResourceUnavailable,
}

/// Backup memory errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Access outside the device capacity
    OutOfBounds,
    /// Device returned fewer bytes than requested
    ShortRead {
        /// Bytes requested
        requested: usize,
        /// Bytes actually read
        read: usize,
    },
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Memory(e) => write!(f, "Backup memory error: {}", e),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfBounds => write!(f, "access out of bounds"),
            MemoryError::ShortRead { requested, read } => {
                write!(f, "short read ({} of {} bytes)", read, requested)
            }
            MemoryError::ReadFailed => write!(f, "read failed"),
            MemoryError::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<MemoryError> for PlatformError {
    fn from(error: MemoryError) -> Self {
        PlatformError::Memory(error)
    }
}

impl core::error::Error for PlatformError {}
