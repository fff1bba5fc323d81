//! TLV entry codec
//!
//! Converts one `(key, value)` entry to bytes and back:
//!
//! ```text
//! [key:1][type_tag:1][value_bytes...]          fixed-width variant
//! [key:1][type_tag:1][length:2|4][bytes...]    dynamic variant
//! ```
//!
//! All integers are little-endian. The codec performs no I/O and keeps no state.

use crate::error::CodecError;
use crate::value::{TypeTag, TypedValue};
use crate::width::FieldWidth;
use alloc::string::String;
use alloc::vec::Vec;

/// Size of the key field
pub const KEY_SIZE: usize = 1;

/// Size of the type tag field
pub const TAG_SIZE: usize = 1;

/// Entry decoded from a payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntry {
    pub key: u8,
    pub value: TypedValue,
    /// Bytes consumed from the start of the entry (key and tag included)
    pub consumed: usize,
}

/// Total encoded size of an entry
pub fn entry_len(value: &TypedValue, width: FieldWidth) -> usize {
    KEY_SIZE + TAG_SIZE + value.encoded_len(width)
}

/// Append the encoding of `(key, value)` to `out`
///
/// Returns the number of bytes appended. Nothing is appended on error.
///
/// # Errors
///
/// - `CodecError::ValueTooLong` if a dynamic value does not fit the length field
/// - `CodecError::UnencodableChar` if a `Char` needs more than one UTF-16 code unit
pub fn encode_entry(
    key: u8,
    value: &TypedValue,
    width: FieldWidth,
    out: &mut Vec<u8>,
) -> Result<usize, CodecError> {
    let start = out.len();

    // Validate before touching `out`
    match value {
        TypedValue::Bytes(bytes) => check_dynamic_len(bytes.len(), width)?,
        TypedValue::Text(text) => check_dynamic_len(text.len(), width)?,
        TypedValue::Char(c) if c.len_utf16() != 1 => return Err(CodecError::UnencodableChar),
        _ => {}
    }

    out.push(key);
    out.push(value.tag() as u8);

    match value {
        TypedValue::Bool(b) => out.push(u8::from(*b)),
        TypedValue::U8(v) => out.push(*v),
        TypedValue::I8(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::I16(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
        TypedValue::F32(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
        TypedValue::F64(v) => out.extend_from_slice(&v.to_bits().to_le_bytes()),
        TypedValue::Char(c) => {
            let mut unit = [0u16; 1];
            c.encode_utf16(&mut unit);
            out.extend_from_slice(&unit[0].to_le_bytes());
        }
        TypedValue::Bytes(bytes) => {
            width.write(bytes.len() as u32, out);
            out.extend_from_slice(bytes);
        }
        TypedValue::Text(text) => {
            width.write(text.len() as u32, out);
            out.extend_from_slice(text.as_bytes());
        }
    }

    Ok(out.len() - start)
}

fn check_dynamic_len(len: usize, width: FieldWidth) -> Result<(), CodecError> {
    if len as u64 > width.max_value() as u64 {
        return Err(CodecError::ValueTooLong {
            len,
            max: width.max_value(),
        });
    }
    Ok(())
}

/// Decode the entry starting at `offset` in `buf`
///
/// The tag is read at `offset + KEY_SIZE`. The returned `consumed` count lets
/// the caller advance to the next entry.
///
/// # Errors
///
/// - `CodecError::UnknownType` if the tag is not a known variant
/// - `CodecError::Truncated` if the entry runs past the end of `buf`
/// - `CodecError::InvalidUtf8` / `CodecError::InvalidChar` for malformed text or characters
pub fn decode_entry(buf: &[u8], offset: usize, width: FieldWidth) -> Result<DecodedEntry, CodecError> {
    let key = *buf.get(offset).ok_or(CodecError::Truncated)?;
    let raw_tag = *buf.get(offset + KEY_SIZE).ok_or(CodecError::Truncated)?;
    let tag = TypeTag::try_from(raw_tag)?;

    let value_start = offset + KEY_SIZE + TAG_SIZE;
    let (value, value_len) = match tag.fixed_width() {
        Some(len) => {
            let raw = take(buf, value_start, len)?;
            (decode_fixed(tag, raw)?, len)
        }
        None => {
            let len_field = buf.get(value_start..).ok_or(CodecError::Truncated)?;
            let len = width.read(len_field).ok_or(CodecError::Truncated)? as usize;
            let raw = take(buf, value_start + width.size(), len)?;
            (decode_dynamic(tag, raw)?, width.size() + len)
        }
    };

    Ok(DecodedEntry {
        key,
        value,
        consumed: KEY_SIZE + TAG_SIZE + value_len,
    })
}

fn take(buf: &[u8], start: usize, len: usize) -> Result<&[u8], CodecError> {
    let end = start.checked_add(len).ok_or(CodecError::Truncated)?;
    buf.get(start..end).ok_or(CodecError::Truncated)
}

fn decode_fixed(tag: TypeTag, raw: &[u8]) -> Result<TypedValue, CodecError> {
    let value = match tag {
        TypeTag::Bool => TypedValue::Bool(raw[0] != 0),
        TypeTag::U8 => TypedValue::U8(raw[0]),
        TypeTag::I8 => TypedValue::I8(raw[0] as i8),
        TypeTag::U16 => TypedValue::U16(u16::from_le_bytes([raw[0], raw[1]])),
        TypeTag::I16 => TypedValue::I16(i16::from_le_bytes([raw[0], raw[1]])),
        TypeTag::U32 => TypedValue::U32(u32::from_le_bytes(le4(raw))),
        TypeTag::I32 => TypedValue::I32(i32::from_le_bytes(le4(raw))),
        TypeTag::F32 => TypedValue::F32(f32::from_bits(u32::from_le_bytes(le4(raw)))),
        TypeTag::U64 => TypedValue::U64(u64::from_le_bytes(le8(raw))),
        TypeTag::I64 => TypedValue::I64(i64::from_le_bytes(le8(raw))),
        TypeTag::F64 => TypedValue::F64(f64::from_bits(u64::from_le_bytes(le8(raw)))),
        TypeTag::Char => {
            let unit = u16::from_le_bytes([raw[0], raw[1]]);
            let c = char::from_u32(unit as u32).ok_or(CodecError::InvalidChar)?;
            TypedValue::Char(c)
        }
        TypeTag::Bytes | TypeTag::Text => return Err(CodecError::UnknownType(tag as u8)),
    };
    Ok(value)
}

fn decode_dynamic(tag: TypeTag, raw: &[u8]) -> Result<TypedValue, CodecError> {
    match tag {
        TypeTag::Bytes => Ok(TypedValue::Bytes(raw.to_vec())),
        TypeTag::Text => {
            let text = core::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?;
            Ok(TypedValue::Text(String::from(text)))
        }
        other => Err(CodecError::UnknownType(other as u8)),
    }
}

fn le4(raw: &[u8]) -> [u8; 4] {
    [raw[0], raw[1], raw[2], raw[3]]
}

fn le8(raw: &[u8]) -> [u8; 8] {
    [raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn encode(key: u8, value: &TypedValue, width: FieldWidth) -> Vec<u8> {
        let mut out = Vec::new();
        encode_entry(key, value, width, &mut out).unwrap();
        out
    }

    #[test]
    fn test_fixed_layout() {
        assert_eq!(
            encode(7, &TypedValue::U32(0x0403_0201), FieldWidth::Narrow),
            [7, 0x06, 0x01, 0x02, 0x03, 0x04]
        );
        assert_eq!(encode(1, &TypedValue::Bool(true), FieldWidth::Narrow), [1, 0x01, 1]);
        assert_eq!(encode(2, &TypedValue::I8(-2), FieldWidth::Narrow), [2, 0x03, 0xFE]);
        assert_eq!(
            encode(3, &TypedValue::Char('A'), FieldWidth::Narrow),
            [3, 0x0C, 0x41, 0x00]
        );
    }

    #[test]
    fn test_dynamic_layout_narrow_and_wide() {
        let value = TypedValue::from("hi");
        assert_eq!(encode(9, &value, FieldWidth::Narrow), [9, 0x0E, 2, 0, b'h', b'i']);
        assert_eq!(
            encode(9, &value, FieldWidth::Wide),
            [9, 0x0E, 2, 0, 0, 0, b'h', b'i']
        );
    }

    #[test]
    fn test_encode_reports_appended_len() {
        let mut out = vec![0xAA];
        let value = TypedValue::Bytes(vec![1, 2, 3]);
        let written = encode_entry(4, &value, FieldWidth::Narrow, &mut out).unwrap();
        assert_eq!(written, entry_len(&value, FieldWidth::Narrow));
        assert_eq!(out.len(), 1 + written);
    }

    #[test]
    fn test_decode_every_variant() {
        let values = [
            TypedValue::Bool(false),
            TypedValue::U8(200),
            TypedValue::I8(-100),
            TypedValue::U16(65000),
            TypedValue::I16(-32000),
            TypedValue::U32(4_000_000_000),
            TypedValue::I32(-2_000_000_000),
            TypedValue::U64(u64::MAX),
            TypedValue::I64(i64::MIN),
            TypedValue::F32(core::f32::consts::PI),
            TypedValue::F64(core::f64::consts::E),
            TypedValue::Char('\u{00E9}'),
            TypedValue::Bytes(vec![0, 1, 2, 255]),
            TypedValue::from("héllo"),
        ];

        for width in [FieldWidth::Narrow, FieldWidth::Wide] {
            let mut payload = Vec::new();
            for (key, value) in values.iter().enumerate() {
                encode_entry(key as u8, value, width, &mut payload).unwrap();
            }

            let mut offset = 0;
            for (key, value) in values.iter().enumerate() {
                let entry = decode_entry(&payload, offset, width).unwrap();
                assert_eq!(entry.key, key as u8);
                assert_eq!(&entry.value, value);
                offset += entry.consumed;
            }
            assert_eq!(offset, payload.len());
        }
    }

    #[test]
    fn test_decode_unknown_tag() {
        let buf = [5, 0x42, 0, 0];
        assert_eq!(
            decode_entry(&buf, 0, FieldWidth::Narrow),
            Err(CodecError::UnknownType(0x42))
        );
    }

    #[test]
    fn test_decode_truncated() {
        // U32 with only two value bytes
        let buf = [1, 0x06, 0x01, 0x02];
        assert_eq!(decode_entry(&buf, 0, FieldWidth::Narrow), Err(CodecError::Truncated));

        // Text whose length runs past the buffer
        let buf = [1, 0x0E, 10, 0, b'a'];
        assert_eq!(decode_entry(&buf, 0, FieldWidth::Narrow), Err(CodecError::Truncated));

        // Missing tag
        assert_eq!(decode_entry(&[1], 0, FieldWidth::Narrow), Err(CodecError::Truncated));
    }

    #[test]
    fn test_decode_invalid_text_and_char() {
        let buf = [1, 0x0E, 2, 0, 0xC3, 0x28];
        assert_eq!(decode_entry(&buf, 0, FieldWidth::Narrow), Err(CodecError::InvalidUtf8));

        // Lone high surrogate
        let buf = [1, 0x0C, 0x00, 0xD8];
        assert_eq!(decode_entry(&buf, 0, FieldWidth::Narrow), Err(CodecError::InvalidChar));
    }

    #[test]
    fn test_encode_rejects_supplementary_char() {
        let mut out = Vec::new();
        let result = encode_entry(1, &TypedValue::Char('\u{1F600}'), FieldWidth::Narrow, &mut out);
        assert_eq!(result, Err(CodecError::UnencodableChar));
        assert!(out.is_empty());
    }

    #[test]
    fn test_encode_rejects_oversized_narrow_value() {
        let mut out = Vec::new();
        let value = TypedValue::Bytes(vec![0; 70_000]);
        let result = encode_entry(1, &value, FieldWidth::Narrow, &mut out);
        assert_eq!(
            result,
            Err(CodecError::ValueTooLong {
                len: 70_000,
                max: 65535
            })
        );
        assert!(out.is_empty());

        assert!(encode_entry(1, &value, FieldWidth::Wide, &mut out).is_ok());
    }
}
