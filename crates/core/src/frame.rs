//! Frame format
//!
//! A frame bundles every encoded entry of the map behind a length header and
//! a checksum:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ count: u16 | u32  (payload length in bytes)  │
//! ├──────────────────────────────────────────────┤
//! │ entry_1 || entry_2 || ... || entry_n         │
//! ├──────────────────────────────────────────────┤
//! │ checksum: u16  (CRC16 over the payload only) │
//! └──────────────────────────────────────────────┘
//! ```

use crate::codec::{decode_entry, encode_entry};
use crate::crc::{calculate_crc16, CRC_SIZE};
use crate::error::CodecError;
use crate::value::TypedValue;
use crate::width::FieldWidth;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Logical map held in a frame
pub type EntryMap = BTreeMap<u8, TypedValue>;

/// Total frame size for a payload of `payload_len` bytes
pub fn frame_len(payload_len: usize, width: FieldWidth) -> usize {
    width.size() + payload_len + CRC_SIZE
}

/// Encode every entry of `entries` into one payload
pub fn encode_payload(entries: &EntryMap, width: FieldWidth) -> Result<Vec<u8>, CodecError> {
    let mut payload = Vec::new();
    for (key, value) in entries {
        encode_entry(*key, value, width, &mut payload)?;
    }
    Ok(payload)
}

/// Wrap a payload into a complete frame (`count`, payload, checksum)
///
/// # Errors
///
/// Returns `CodecError::ValueTooLong` if the payload length does not fit the
/// `count` field.
pub fn encode_frame(payload: &[u8], width: FieldWidth) -> Result<Vec<u8>, CodecError> {
    if payload.len() as u64 > width.max_value() as u64 {
        return Err(CodecError::ValueTooLong {
            len: payload.len(),
            max: width.max_value(),
        });
    }

    let mut frame = Vec::with_capacity(frame_len(payload.len(), width));
    width.write(payload.len() as u32, &mut frame);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&calculate_crc16(payload).to_le_bytes());
    Ok(frame)
}

/// Decode a payload into its entries
///
/// Walks the payload from offset 0 until the running offset reaches its
/// length. A repeated key replaces the earlier entry.
pub fn decode_payload(payload: &[u8], width: FieldWidth) -> Result<EntryMap, CodecError> {
    let mut entries = EntryMap::new();
    let mut offset = 0;

    while offset < payload.len() {
        let entry = decode_entry(payload, offset, width)?;
        offset += entry.consumed;
        entries.insert(entry.key, entry.value);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::validate_crc16;
    use alloc::vec;

    fn sample_map() -> EntryMap {
        let mut entries = EntryMap::new();
        entries.insert(1, TypedValue::U16(100));
        entries.insert(2, TypedValue::from("name"));
        entries.insert(200, TypedValue::Bytes(vec![9, 8, 7]));
        entries
    }

    #[test]
    fn test_frame_layout() {
        let payload = encode_payload(&sample_map(), FieldWidth::Narrow).unwrap();
        let frame = encode_frame(&payload, FieldWidth::Narrow).unwrap();

        assert_eq!(frame.len(), frame_len(payload.len(), FieldWidth::Narrow));
        assert_eq!(
            u16::from_le_bytes([frame[0], frame[1]]) as usize,
            payload.len()
        );
        assert_eq!(&frame[2..2 + payload.len()], payload.as_slice());

        let crc_at = 2 + payload.len();
        let stored = u16::from_le_bytes([frame[crc_at], frame[crc_at + 1]]);
        assert!(validate_crc16(&payload, stored));
    }

    #[test]
    fn test_wide_frame_header() {
        let payload = encode_payload(&sample_map(), FieldWidth::Wide).unwrap();
        let frame = encode_frame(&payload, FieldWidth::Wide).unwrap();

        assert_eq!(FieldWidth::Wide.read(&frame), Some(payload.len() as u32));
        assert_eq!(frame.len(), 4 + payload.len() + 2);
    }

    #[test]
    fn test_payload_decodes_to_same_map() {
        let entries = sample_map();
        let payload = encode_payload(&entries, FieldWidth::Narrow).unwrap();
        assert_eq!(decode_payload(&payload, FieldWidth::Narrow).unwrap(), entries);
    }

    #[test]
    fn test_empty_payload() {
        let payload = encode_payload(&EntryMap::new(), FieldWidth::Narrow).unwrap();
        assert!(payload.is_empty());
        assert!(decode_payload(&payload, FieldWidth::Narrow).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let mut payload = Vec::new();
        encode_entry(5, &TypedValue::U8(1), FieldWidth::Narrow, &mut payload).unwrap();
        encode_entry(5, &TypedValue::U8(2), FieldWidth::Narrow, &mut payload).unwrap();

        let entries = decode_payload(&payload, FieldWidth::Narrow).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get(&5), Some(&TypedValue::U8(2)));
    }

    #[test]
    fn test_unknown_tag_stops_decode() {
        let mut payload = Vec::new();
        encode_entry(1, &TypedValue::U8(1), FieldWidth::Narrow, &mut payload).unwrap();
        payload.extend_from_slice(&[2, 0x7F, 0]);

        assert_eq!(
            decode_payload(&payload, FieldWidth::Narrow),
            Err(CodecError::UnknownType(0x7F))
        );
    }
}
