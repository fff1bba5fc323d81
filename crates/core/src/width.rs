//! Length field width
//!
//! The frame `count` header and every dynamic entry's `length` prefix share one
//! width, fixed for the lifetime of a store from the backing capacity.

/// Capacity above which length fields switch to 4 bytes
pub const NARROW_CAPACITY_LIMIT: u32 = u16::MAX as u32;

/// Width of length-carrying fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// 2-byte little-endian length (capacity <= 65535)
    Narrow,
    /// 4-byte little-endian length (capacity > 65535)
    Wide,
}

impl FieldWidth {
    /// Pick the width for a region of `capacity` bytes
    pub fn for_capacity(capacity: u32) -> Self {
        if capacity > NARROW_CAPACITY_LIMIT {
            FieldWidth::Wide
        } else {
            FieldWidth::Narrow
        }
    }

    /// Encoded size in bytes
    pub const fn size(self) -> usize {
        match self {
            FieldWidth::Narrow => 2,
            FieldWidth::Wide => 4,
        }
    }

    /// Largest length this width can express
    pub const fn max_value(self) -> u32 {
        match self {
            FieldWidth::Narrow => u16::MAX as u32,
            FieldWidth::Wide => u32::MAX,
        }
    }

    /// Append `value` as a little-endian length field
    ///
    /// Callers check `value <= self.max_value()` first; a narrow field keeps the
    /// low 16 bits.
    pub fn write(self, value: u32, out: &mut alloc::vec::Vec<u8>) {
        match self {
            FieldWidth::Narrow => out.extend_from_slice(&(value as u16).to_le_bytes()),
            FieldWidth::Wide => out.extend_from_slice(&value.to_le_bytes()),
        }
    }

    /// Read a little-endian length field from the start of `buf`
    ///
    /// Returns `None` if `buf` is shorter than the field.
    pub fn read(self, buf: &[u8]) -> Option<u32> {
        match self {
            FieldWidth::Narrow => {
                let bytes = buf.get(..2)?;
                Some(u16::from_le_bytes([bytes[0], bytes[1]]) as u32)
            }
            FieldWidth::Wide => {
                let bytes = buf.get(..4)?;
                Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
        }
    }
}
