//! Typed values
//!
//! A stored value is one of a closed set of primitive variants. Every variant
//! has a fixed encoded width except `Bytes` and `Text`, which carry a length
//! prefix.

use crate::error::CodecError;
use crate::width::FieldWidth;
use alloc::string::String;
use alloc::vec::Vec;

/// One-byte type tag written after the key of every entry
///
/// `0x00` and `0xFF` are never assigned, so zeroed or erased memory does not
/// decode as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeTag {
    Bool = 0x01,
    U8 = 0x02,
    I8 = 0x03,
    U16 = 0x04,
    I16 = 0x05,
    U32 = 0x06,
    I32 = 0x07,
    U64 = 0x08,
    I64 = 0x09,
    F32 = 0x0A,
    F64 = 0x0B,
    Char = 0x0C,
    Bytes = 0x0D,
    Text = 0x0E,
}

impl TypeTag {
    /// Width of the raw value for fixed variants, `None` for dynamic ones
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            TypeTag::Bool | TypeTag::U8 | TypeTag::I8 => Some(1),
            TypeTag::U16 | TypeTag::I16 | TypeTag::Char => Some(2),
            TypeTag::U32 | TypeTag::I32 | TypeTag::F32 => Some(4),
            TypeTag::U64 | TypeTag::I64 | TypeTag::F64 => Some(8),
            TypeTag::Bytes | TypeTag::Text => None,
        }
    }
}

impl TryFrom<u8> for TypeTag {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        let tag = match tag {
            0x01 => TypeTag::Bool,
            0x02 => TypeTag::U8,
            0x03 => TypeTag::I8,
            0x04 => TypeTag::U16,
            0x05 => TypeTag::I16,
            0x06 => TypeTag::U32,
            0x07 => TypeTag::I32,
            0x08 => TypeTag::U64,
            0x09 => TypeTag::I64,
            0x0A => TypeTag::F32,
            0x0B => TypeTag::F64,
            0x0C => TypeTag::Char,
            0x0D => TypeTag::Bytes,
            0x0E => TypeTag::Text,
            other => return Err(CodecError::UnknownType(other)),
        };
        Ok(tag)
    }
}

/// Value stored under a key
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Single UTF-16 code unit; characters outside the BMP cannot be encoded
    Char(char),
    /// Opaque byte sequence
    Bytes(Vec<u8>),
    /// UTF-8 text
    Text(String),
}

impl TypedValue {
    /// Type tag written for this value
    pub fn tag(&self) -> TypeTag {
        match self {
            TypedValue::Bool(_) => TypeTag::Bool,
            TypedValue::U8(_) => TypeTag::U8,
            TypedValue::I8(_) => TypeTag::I8,
            TypedValue::U16(_) => TypeTag::U16,
            TypedValue::I16(_) => TypeTag::I16,
            TypedValue::U32(_) => TypeTag::U32,
            TypedValue::I32(_) => TypeTag::I32,
            TypedValue::U64(_) => TypeTag::U64,
            TypedValue::I64(_) => TypeTag::I64,
            TypedValue::F32(_) => TypeTag::F32,
            TypedValue::F64(_) => TypeTag::F64,
            TypedValue::Char(_) => TypeTag::Char,
            TypedValue::Bytes(_) => TypeTag::Bytes,
            TypedValue::Text(_) => TypeTag::Text,
        }
    }

    /// Whether this value is length-prefixed
    pub fn is_dynamic(&self) -> bool {
        self.tag().fixed_width().is_none()
    }

    /// Encoded size of the value part (length prefix included, key and tag excluded)
    pub fn encoded_len(&self, width: FieldWidth) -> usize {
        match self {
            TypedValue::Bytes(bytes) => width.size() + bytes.len(),
            TypedValue::Text(text) => width.size() + text.len(),
            other => other.tag().fixed_width().unwrap_or(0),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TypedValue {
                fn from(value: $ty) -> Self {
                    TypedValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
    Vec<u8> => Bytes,
    String => Text,
}

impl From<&[u8]> for TypedValue {
    fn from(value: &[u8]) -> Self {
        TypedValue::Bytes(value.to_vec())
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Text(String::from(value))
    }
}
