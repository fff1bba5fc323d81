//! Codec error types
//!
//! Errors raised while encoding or decoding TLV entries and frame payloads.

/// Errors from TLV encode/decode operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Type tag does not name a known value variant
    UnknownType(u8),
    /// Entry runs past the end of the buffer
    Truncated,
    /// Text value is not valid UTF-8
    InvalidUtf8,
    /// Character value is a lone surrogate code unit
    InvalidChar,
    /// Dynamic value is longer than the length field can express
    ValueTooLong {
        /// Value length in bytes
        len: usize,
        /// Largest length the configured field width can hold
        max: u32,
    },
    /// Character lies outside the Basic Multilingual Plane (needs two code units)
    UnencodableChar,
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::UnknownType(tag) => write!(f, "unknown type tag 0x{:02X}", tag),
            CodecError::Truncated => write!(f, "entry truncated"),
            CodecError::InvalidUtf8 => write!(f, "text value is not valid UTF-8"),
            CodecError::InvalidChar => write!(f, "character is a lone surrogate"),
            CodecError::ValueTooLong { len, max } => {
                write!(f, "value of {} bytes exceeds length field maximum {}", len, max)
            }
            CodecError::UnencodableChar => {
                write!(f, "character does not fit in a single UTF-16 code unit")
            }
        }
    }
}

impl core::error::Error for CodecError {}
