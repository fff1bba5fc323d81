#![cfg_attr(not(test), no_std)]

//! retained_kv - Persistent key/value store for retained backup RAM
//!
//! This library keeps a small typed key/value map in a fixed-size memory region
//! that survives resets (battery-backed SRAM, retained RAM sections). The map
//! is stored as a single TLV-encoded frame with a CRC16 checksum, placed at a
//! varying offset in a circular region.
//!
//! The byte format lives in [`retained_kv_core`]; this crate adds the device
//! abstraction, frame placement and the public store API.

extern crate alloc;

// Logging macros (log_info!, log_warn!, log_error!, log_debug!, log_trace!)
// are exported at crate root via #[macro_export]
pub mod logging;

// Backup memory abstraction and devices
pub mod platform;

// Frame store and key/value manager
pub mod storage;

pub use retained_kv_core::{CodecError, EntryMap, FieldWidth, TypeTag, TypedValue};
pub use storage::{FrameStatus, FrameStore, KeyValueStore, StoreConfig, StoreError};
