//! retained_kv_core - Pure no_std codec for the retained key/value store
//!
//! This crate contains the byte-level format of the store and nothing else:
//! no I/O, no logging, no feature flags. It can be tested on host as-is.
//!
//! # Modules
//!
//! - [`value`]: `TypedValue` and its one-byte `TypeTag`
//! - [`width`]: 2/4-byte length field selection
//! - [`codec`]: TLV encode/decode of a single entry
//! - [`frame`]: frame assembly (`count`, payload, checksum) and payload walking
//! - [`crc`]: CRC16 utilities
//! - [`error`]: codec error type

#![no_std]

extern crate alloc;

pub mod codec;
pub mod crc;
pub mod error;
pub mod frame;
pub mod value;
pub mod width;

pub use codec::{decode_entry, encode_entry, entry_len, DecodedEntry, KEY_SIZE, TAG_SIZE};
pub use crc::{calculate_crc16, validate_crc16, CRC_SIZE};
pub use error::CodecError;
pub use frame::{decode_payload, encode_frame, encode_payload, frame_len, EntryMap};
pub use value::{TypeTag, TypedValue};
pub use width::{FieldWidth, NARROW_CAPACITY_LIMIT};
