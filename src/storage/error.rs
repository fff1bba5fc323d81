//! Store error types

use crate::platform::PlatformError;
use retained_kv_core::CodecError;

/// Result type for store operations
pub type Result<T> = core::result::Result<T, StoreError>;

/// Errors surfaced to callers of the store
///
/// Device and checksum failures while loading are not errors: they degrade
/// the load to an empty map with `FrameStatus::Corrupted`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Encoded frame does not fit the backing region
    #[error("frame of {required} bytes exceeds capacity of {capacity} bytes")]
    Capacity { required: usize, capacity: u32 },

    /// Entry could not be encoded or a loaded frame holds an undecodable entry
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Caller passed an argument the store cannot act on
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Read-back after a write did not match the written frame
    #[error("write verification failed at offset {offset}")]
    VerifyFailed { offset: u32 },

    /// Device rejected a write
    #[error("device error: {0}")]
    Device(#[from] PlatformError),
}

/// Reasons a frame could not be read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Device read failed or returned too few bytes
    #[error("device error: {0}")]
    Device(#[from] PlatformError),

    /// `count` header describes a frame larger than the region
    #[error("frame length {count} exceeds region")]
    LengthOutOfRange { count: u32 },

    /// Payload checksum does not match the stored checksum
    #[error("checksum mismatch (stored 0x{stored:04X}, computed 0x{computed:04X})")]
    ChecksumMismatch { stored: u16, computed: u16 },
}
