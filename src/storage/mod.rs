//! Persistent key/value storage
//!
//! The store keeps one logical map in one physical frame inside a circular
//! backup memory region. Each mutation rewrites the whole map as a new frame at
//! a freshly chosen offset; the previous frame's bytes are abandoned in place.
//!
//! - [`FrameStore`]: frame placement, wraparound I/O and checksum verification
//! - [`KeyValueStore`]: recall / add-or-replace / remove / free / dump

pub mod config;
pub mod error;
pub mod frame_store;
pub mod manager;

pub use config::{StoreConfig, DEFAULT_SEED};
pub use error::{FrameError, Result, StoreError};
pub use frame_store::{FrameStatus, FrameStore, LoadedFrame, StoreStats, DUMP_ROW_LEN};
pub use manager::KeyValueStore;
